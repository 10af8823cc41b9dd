use crate::error::{MapError, Result};
use crate::models::{BoundingExtent, StationRecord};
use crate::readers::column_layout::ColumnLayout;
use crate::utils::constants::{
    CALL_SIGN_FIELD, DIVIDER_ROW, ELEVATION_FIELD, FIRST_DATA_ROW, HEADER_ROW, LATITUDE_FIELD,
    LONGITUDE_FIELD, NAME_FIELD,
};
use crate::utils::coordinates::parse_coordinate;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Stations parsed from a listing, together with the layout used to slice them.
#[derive(Debug, Clone, Default)]
pub struct ParsedStations {
    pub layout: ColumnLayout,
    pub stations: Vec<StationRecord>,
}

impl ParsedStations {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn within<'a>(
        &'a self,
        extent: &'a BoundingExtent,
    ) -> impl Iterator<Item = &'a StationRecord> + 'a {
        self.stations
            .iter()
            .filter(move |s| extent.contains_strict(s.longitude, s.latitude))
    }
}

/// Reader for the NCEI fixed-width ASOS station listing.
///
/// Expected layout, by 0-based row:
///
/// ```text
/// 0-1  free-form metadata
/// 2    column header
/// 3    divider ("-------- ----- ... "), defines the column widths
/// 4..  one station per row
/// ```
///
/// Field extraction uses hardcoded positional indices (call sign, name,
/// latitude, longitude, elevation); the header-derived column names are
/// informational and never used to locate a field.
pub struct StationReader {
    skip_blank_rows: bool,
}

impl StationReader {
    pub fn new() -> Self {
        Self {
            skip_blank_rows: true,
        }
    }

    pub fn with_skip_blank_rows(skip_blank_rows: bool) -> Self {
        Self { skip_blank_rows }
    }

    /// Read and parse the station listing at `path`.
    pub fn read_stations(&self, path: &Path) -> Result<ParsedStations> {
        let bytes = fs::read(path)?;
        let text = decode_listing(&bytes);
        let parsed = self.parse_listing(&text)?;

        info!(
            "Parsed {} stations from {}",
            parsed.len(),
            path.display()
        );
        Ok(parsed)
    }

    /// Parse an already decoded listing. Any malformed row fails the whole parse.
    pub fn parse_listing(&self, text: &str) -> Result<ParsedStations> {
        let rows: Vec<&str> = text.lines().collect();

        if rows.len() <= DIVIDER_ROW {
            return Err(MapError::Layout(format!(
                "expected a header at row {} and a divider at row {}, found only {} rows",
                HEADER_ROW,
                DIVIDER_ROW,
                rows.len()
            )));
        }

        let layout = ColumnLayout::from_divider(rows[DIVIDER_ROW])?.with_header(rows[HEADER_ROW]);
        if layout.len() <= ELEVATION_FIELD {
            return Err(MapError::Layout(format!(
                "divider defines {} columns but field {} (elevation) is required",
                layout.len(),
                ELEVATION_FIELD
            )));
        }

        debug!(
            "Column layout: widths={:?} names={:?}",
            layout.widths(),
            layout.names()
        );

        let mut stations = Vec::with_capacity(rows.len().saturating_sub(FIRST_DATA_ROW));
        for (row_index, row) in rows.iter().enumerate().skip(FIRST_DATA_ROW) {
            if self.skip_blank_rows && row.trim().is_empty() {
                debug!("Skipping blank row {}", row_index);
                continue;
            }

            stations.push(self.parse_station_row(&layout, row, row_index)?);
        }

        Ok(ParsedStations { layout, stations })
    }

    fn parse_station_row(
        &self,
        layout: &ColumnLayout,
        row: &str,
        row_index: usize,
    ) -> Result<StationRecord> {
        let fields = layout.slice_fields(row);

        let latitude = parse_coordinate(&fields[LATITUDE_FIELD], row_index, "latitude")?;
        let longitude = parse_coordinate(&fields[LONGITUDE_FIELD], row_index, "longitude")?;
        let elevation = parse_coordinate(&fields[ELEVATION_FIELD], row_index, "elevation")?;

        Ok(StationRecord::new(
            fields[CALL_SIGN_FIELD].clone(),
            fields[NAME_FIELD].clone(),
            latitude,
            longitude,
            elevation,
        ))
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode listing bytes as UTF-8 (honouring a BOM), falling back to
/// Windows-1252 when the file is not valid UTF-8.
pub fn decode_listing(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }

    debug!("Listing is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DIVIDER: &str = "-- -- -- ---- ---------------- -- -- -- -- -------- ---------- ---- ";
    const HEADER: &str = "A  B  C  CALL NAME             D  E  F  G  LAT      LON        ELEV ";

    fn row(call: &str, name: &str, lat: &str, lon: &str, elev: &str) -> String {
        format!(
            "01 02 03 {:<4} {:<16} 04 05 06 07 {:<8} {:<10} {:<4} ",
            call, name, lat, lon, elev
        )
    }

    fn listing(rows: &[String]) -> String {
        let mut text = String::from("ASOS STATION LIST\nGENERATED FOR TESTS\n");
        text.push_str(HEADER);
        text.push('\n');
        text.push_str(DIVIDER);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_station_rows() {
        let text = listing(&[
            row("NYC", "CENTRAL PARK", "40.77898", "-73.96925", "154"),
            row("JFK", "JFK INTL AIRPORT", "40.63915", "-73.76393", "13"),
        ]);

        let parsed = StationReader::new().parse_listing(&text).unwrap();
        assert_eq!(parsed.len(), 2);

        let nyc = &parsed.stations[0];
        assert_eq!(nyc.call_sign, "NYC ");
        assert_eq!(nyc.name, "CENTRAL PARK");
        assert!((nyc.latitude - 40.77898).abs() < 1e-9);
        assert!((nyc.longitude + 73.96925).abs() < 1e-9);
        assert_eq!(nyc.elevation, 154.0);

        assert_eq!(parsed.stations[1].call_sign, "JFK ");
        assert_eq!(parsed.stations[1].name, "JFK INTL AIRPORT");
        assert_eq!(parsed.stations[1].elevation, 13.0);
    }

    #[test]
    fn test_header_names_are_informational() {
        let parsed = StationReader::new().parse_listing(&listing(&[])).unwrap();

        assert!(parsed.is_empty());
        assert_eq!(
            parsed.layout.names(),
            vec!["A", "B", "C", "CALL", "NAME", "D", "E", "F", "G", "LAT", "LON", "ELEV"]
        );
    }

    #[test]
    fn test_crlf_and_trailing_blank_rows() {
        let text = listing(&[
            row("NYC", "CENTRAL PARK", "40.77898", "-73.96925", "154"),
            String::new(),
        ])
        .replace('\n', "\r\n");

        let parsed = StationReader::new().parse_listing(&text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.stations[0].elevation, 154.0);
    }

    #[test]
    fn test_blank_rows_fail_when_not_skipped() {
        let text = listing(&[String::new()]);
        assert!(StationReader::with_skip_blank_rows(false)
            .parse_listing(&text)
            .is_err());
    }

    #[test]
    fn test_non_numeric_latitude_aborts() {
        let text = listing(&[
            row("NYC", "CENTRAL PARK", "40.77898", "-73.96925", "154"),
            row("BAD", "BROKEN ROW", "UNKNOWN", "-73.76393", "13"),
        ]);

        let err = StationReader::new().parse_listing(&text).unwrap_err();
        match err {
            MapError::FieldParse { row, field, .. } => {
                assert_eq!(row, 5);
                assert_eq!(field, "latitude");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_few_rows() {
        let err = StationReader::new()
            .parse_listing("meta\nmeta\nHEADER\n")
            .unwrap_err();
        assert!(matches!(err, MapError::Layout(_)));
    }

    #[test]
    fn test_too_few_columns() {
        let text = "meta\nmeta\nCALL NAME\n---- ---- \nJFK  KENNEDY\n";
        let err = StationReader::new().parse_listing(text).unwrap_err();
        assert!(matches!(err, MapError::Layout(_)));
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        let bytes = b"CURA\xC7AO";
        assert_eq!(decode_listing(bytes), "CURAÇAO");
        assert_eq!(decode_listing("PLAIN".as_bytes()), "PLAIN");
    }

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(
            temp_file,
            "{}",
            listing(&[row("LGA", "LA GUARDIA ARPT", "40.77945", "-73.88027", "11")])
        )?;

        let parsed = StationReader::new().read_stations(temp_file.path())?;
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.stations[0].name, "LA GUARDIA ARPT ");

        Ok(())
    }

    #[test]
    fn test_within_extent() {
        let text = listing(&[
            row("NYC", "CENTRAL PARK", "40.77898", "-73.96925", "154"),
            row("ALB", "ALBANY INTL", "42.74722", "-73.79912", "285"),
        ]);
        let parsed = StationReader::new().parse_listing(&text).unwrap();
        let extent = BoundingExtent::nyc();

        let inside: Vec<&str> = parsed.within(&extent).map(|s| s.call_sign.as_str()).collect();
        assert_eq!(inside, vec!["NYC "]);
    }
}
