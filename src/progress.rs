use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for the per-item crawl loops. Drawn to stderr, hidden when it is not a terminal.
pub fn bar(total: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}
