use asos_station_map::models::BoundingExtent;
use asos_station_map::readers::StationReader;
use asos_station_map::render::{
    render_station_map, zoom_for_extent, MapOverlay, RenderOptions, RenderSummary,
};
use asos_station_map::tiles::{Basemap, ClientIdentity, HttpTileSource, TileRange, TileSource};
use asos_station_map::MapError;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::{NamedTempFile, TempDir};

#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    user_agent: Option<String>,
}

struct TileServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TileServer {
    fn url_template(&self) -> String {
        format!("http://{}/{{z}}/{{x}}/{{y}}.png", self.addr)
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn tile_png() -> Vec<u8> {
    let tile = RgbImage::from_pixel(256, 256, Rgb([180, 200, 170]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(tile)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Minimal HTTP/1.1 server answering every request with `status_line` and a PNG tile.
fn spawn_tile_server(status_line: &'static str) -> TileServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let body = tile_png();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };

            let mut reader = BufReader::new(&stream);
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }

            let mut user_agent = None;
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("user-agent") {
                        user_agent = Some(value.trim().to_string());
                    }
                }
            }

            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            recorded
                .lock()
                .unwrap()
                .push(RecordedRequest { path, user_agent });

            let head = format!(
                "{}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            let mut writer = &stream;
            let _ = writer.write_all(head.as_bytes());
            let _ = writer.write_all(&body);
            let _ = writer.flush();
        }
    });

    TileServer { addr, requests }
}

fn local_source(server: &TileServer) -> HttpTileSource {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    HttpTileSource::with_client(client, server.url_template(), ClientIdentity::default())
}

fn nyc_listing() -> String {
    asos_listing(&[
        ("NYC", "NEW YORK CNTRL PK TWR", "40.77898", "-73.96925", "154"),
        ("JFK", "NEW YORK J F KENNEDY INTL AP", "40.63915", "-73.76393", "13"),
    ])
}

fn write_listing(listing: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(listing.as_bytes()).unwrap();
    file
}

#[test]
fn test_listing_parses_two_stations() {
    let file = write_listing(&nyc_listing());
    let parsed = StationReader::new().read_stations(file.path()).unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(
        parsed.layout.names(),
        vec![
            "NCDCID", "WBAN", "COOPID", "CALL", "NAME", "ALT_NAME", "COUNTRY", "ST", "COUNTY",
            "LAT", "LON", "ELEV"
        ]
    );

    let park = &parsed.stations[0];
    assert_eq!(park.call_sign.trim(), "NYC");
    assert_eq!(park.name.trim(), "NEW YORK CNTRL PK TWR");
    assert!((park.latitude - 40.77898).abs() < 1e-9);
    assert!((park.longitude + 73.96925).abs() < 1e-9);
    assert_eq!(park.elevation, 154.0);

    // Even-length padding collapses completely
    assert_eq!(parsed.stations[1].name, "NEW YORK J F KENNEDY INTL AP");
    assert_eq!(parsed.stations[1].elevation, 13.0);
}

#[test]
fn test_end_to_end_fetch_uses_spoofed_identity() {
    let file = write_listing(&nyc_listing());
    let parsed = StationReader::new().read_stations(file.path()).unwrap();
    assert_eq!(parsed.len(), 2);

    let server = spawn_tile_server("HTTP/1.1 200 OK");
    let source = local_source(&server);
    let extent = BoundingExtent::nyc();
    let zoom = zoom_for_extent(&extent);
    assert_eq!(zoom, 11);
    let basemap = Basemap::fetch(&source, &extent, zoom, None).unwrap();

    let requests = server.requests();
    let expected: Vec<String> = TileRange::covering(&extent, zoom)
        .iter()
        .map(|t| format!("/{}/{}/{}.png", t.z, t.x, t.y))
        .collect();

    assert_eq!(requests.len(), 16);
    assert_eq!(
        requests.iter().map(|r| r.path.clone()).collect::<Vec<_>>(),
        expected
    );
    for request in &requests {
        assert_eq!(request.user_agent.as_deref(), Some("Anaconda 3"));
    }
    assert_eq!(basemap.range().len(), requests.len());
    assert_eq!(basemap.mosaic().dimensions(), (4 * 256, 4 * 256));

    let overlay = MapOverlay::plan(
        &parsed.stations,
        &extent,
        0.01,
        &mut StdRng::seed_from_u64(2020),
    )
    .unwrap();
    assert_eq!(overlay.markers.len(), 2);
    assert_eq!(overlay.labels.len(), 2);
}

#[test]
fn test_custom_identity_is_sent() {
    let server = spawn_tile_server("HTTP/1.1 200 OK");
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    let source = HttpTileSource::with_client(
        client,
        server.url_template(),
        ClientIdentity::new("Mozilla/5.0 (X11; Linux x86_64)"),
    );

    let tile = source
        .fetch_tile(&asos_station_map::tiles::TileCoords::new(11, 602, 769))
        .unwrap();
    assert_eq!(tile.dimensions(), (256, 256));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/11/602/769.png");
    assert_eq!(
        requests[0].user_agent.as_deref(),
        Some("Mozilla/5.0 (X11; Linux x86_64)")
    );
}

#[test]
fn test_server_error_aborts_basemap() {
    let server = spawn_tile_server("HTTP/1.1 503 Service Unavailable");
    let source = local_source(&server);

    let result = Basemap::fetch(&source, &BoundingExtent::nyc(), 11, None);
    match result {
        Err(MapError::TileStatus { status, .. }) => assert_eq!(status.as_u16(), 503),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected the basemap fetch to fail"),
    }
    // No retries: the first failure stops the fan-out
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_outside_station_is_marked_not_labelled() {
    let listing = asos_listing(&[
        ("NYC", "NEW YORK CNTRL PK TWR", "40.77898", "-73.96925", "154"),
        ("ALB", "ALBANY INTL AP", "42.74722", "-73.79912", "285"),
    ]);
    let parsed = StationReader::new().parse_listing(&listing).unwrap();

    let overlay = MapOverlay::plan(
        &parsed.stations,
        &BoundingExtent::nyc(),
        0.01,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();

    assert_eq!(overlay.markers.len(), 2);
    assert!(overlay
        .markers
        .iter()
        .any(|m| (m.lat - 42.74722).abs() < 1e-9));
    let labels: Vec<&str> = overlay.labels.iter().map(|l| l.text.trim()).collect();
    assert_eq!(labels, vec!["NEW YORK CNTRL PK TWR"]);
}

#[test]
#[ignore = "needs system fonts for text rendering"]
fn test_render_pipeline_against_local_tiles() {
    let parsed = StationReader::new().parse_listing(&nyc_listing()).unwrap();
    let server = spawn_tile_server("HTTP/1.1 200 OK");
    let source = local_source(&server);

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output").join("nyc.png");
    let options = RenderOptions::new(output.clone());

    let summary = render_station_map(
        &parsed.stations,
        &source,
        &options,
        &mut StdRng::seed_from_u64(2020),
        None,
    )
    .unwrap();

    assert_eq!(
        summary,
        RenderSummary {
            zoom: 11,
            tiles: 16,
            markers: 2,
            labels: 2,
            output: output.clone(),
        }
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 16);
    assert!(requests
        .iter()
        .all(|r| r.user_agent.as_deref() == Some("Anaconda 3")));

    let written = image::open(&output).unwrap();
    assert_eq!((written.width(), written.height()), (1200, 900));
}

/// Build a six-row listing in the NCEI twelve-column layout.
fn asos_listing(stations: &[(&str, &str, &str, &str, &str)]) -> String {
    let mut text = String::from("ASOS STATIONS LIST\nGENERATED 2020-04-24\n");
    text.push_str(&format!(
        "{:<8} {:<5} {:<6} {:<4} {:<30} {:<30} {:<20} {:<2} {:<30} {:<9} {:<10} {:<6} \n",
        "NCDCID", "WBAN", "COOPID", "CALL", "NAME", "ALT_NAME", "COUNTRY", "ST", "COUNTY",
        "LAT", "LON", "ELEV"
    ));
    text.push_str(&format!(
        "{} {} {} {} {} {} {} {} {} {} {} {} \n",
        "-".repeat(8),
        "-".repeat(5),
        "-".repeat(6),
        "-".repeat(4),
        "-".repeat(30),
        "-".repeat(30),
        "-".repeat(20),
        "-".repeat(2),
        "-".repeat(30),
        "-".repeat(9),
        "-".repeat(10),
        "-".repeat(6)
    ));
    for (call, name, lat, lon, elev) in stations {
        text.push_str(&format!(
            "{:<8} {:<5} {:<6} {:<4} {:<30} {:<30} {:<20} {:<2} {:<30} {:<9} {:<10} {:<6} \n",
            "20024", "94728", "305801", call, name, "", "UNITED STATES", "NY", "NEW YORK", lat,
            lon, elev
        ));
    }
    text
}
