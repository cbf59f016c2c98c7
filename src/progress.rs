//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display progress in the terminal while a scan runs. Bars are drawn on
//! stderr so they never mix with report output on stdout.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline. Phases are `"walking"` and `"hashing"`.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase
    /// * `total` - Total number of items to process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupewise::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    /// Whether drawing is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn active_bar(&self) -> Option<ProgressBar> {
        let hashing = self.hashing.lock().ok().and_then(|pb| pb.clone());
        hashing.or_else(|| self.walking.lock().ok().and_then(|pb| pb.clone()))
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                if let Ok(mut walking) = self.walking.lock() {
                    *walking = Some(pb);
                }
            }
            "hashing" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                if let Ok(mut hashing) = self.hashing.lock() {
                    *hashing = Some(pb);
                }
            }
            other => log::debug!("No progress bar for phase {}", other),
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.active_bar() {
            // Hash workers report out of order; never move the bar backwards.
            if current as u64 > pb.position() {
                pb.set_position(current as u64);
            }
            pb.set_message(truncate_path(path, 30));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let (slot, message) = match phase {
            "walking" => (&self.walking, "Walking complete"),
            "hashing" => (&self.hashing, "Hashing complete"),
            _ => return,
        };
        if let Some(pb) = slot.lock().ok().and_then(|mut pb| pb.take()) {
            pb.finish_with_message(message);
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.active_bar() {
            pb.set_message(message.to_string());
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_path_unchanged() {
        assert_eq!(truncate_path("/a/b.txt", 30), "/a/b.txt");
    }

    #[test]
    fn test_truncate_long_path_keeps_file_name() {
        let path = "/very/long/directory/structure/that/goes/on/report.pdf";
        assert_eq!(truncate_path(path, 30), ".../report.pdf");
    }

    #[test]
    fn test_truncate_long_file_name() {
        let name = format!("/dir/{}", "x".repeat(50));
        let truncated = truncate_path(&name, 30);
        assert!(truncated.starts_with("..."));
        assert_eq!(truncated.chars().count(), 30);
    }

    #[test]
    fn test_quiet_progress_ignores_events() {
        let progress = Progress::new(true);
        progress.on_phase_start("walking", 0);
        progress.on_progress(1, "/tmp/a");
        progress.on_phase_end("walking");
        assert!(progress.walking.lock().unwrap().is_none());
    }

    #[test]
    fn test_phase_lifecycle() {
        let progress = Progress::new(false);
        progress.on_phase_start("hashing", 3);
        progress.on_progress(2, "/tmp/a");
        progress.on_progress(1, "/tmp/b");
        assert_eq!(progress.active_bar().unwrap().position(), 2);
        progress.on_phase_end("hashing");
        assert!(progress.hashing.lock().unwrap().is_none());
    }
}
