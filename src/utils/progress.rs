use crate::tiles::TileCoords;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TILE_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles {msg}";

/// Terminal progress for basemap tile downloads.
///
/// A quiet reporter holds no bar and swallows every call, so callers never
/// branch on verbosity themselves.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total_tiles: u64, quiet: bool) -> Self {
        if quiet {
            return Self::quiet();
        }

        let bar = ProgressBar::new(total_tiles);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TILE_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar: Some(bar) }
    }

    pub fn quiet() -> Self {
        Self { bar: None }
    }

    pub fn is_quiet(&self) -> bool {
        self.bar.is_none()
    }

    /// Count one downloaded tile and show which one it was.
    pub fn tile_fetched(&self, coords: &TileCoords) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("(last {})", coords));
            bar.inc(1);
        }
    }

    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Print above the bar, or to stdout once it is gone. Quiet reporters print nothing.
    pub fn println(&self, message: &str) {
        if let Some(bar) = &self.bar {
            if bar.is_finished() {
                println!("{}", message);
            } else {
                bar.println(message);
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }
}
