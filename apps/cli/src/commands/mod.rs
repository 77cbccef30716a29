pub mod run;
pub mod search;

use vs_video_search::{PresentedResult, match_count_label};

pub(crate) fn print_results(results: &[PresentedResult]) {
    if results.is_empty() {
        println!("No matches.");
        return;
    }

    println!("{}", match_count_label(results.len()));
    for r in results {
        println!(
            "  #{:<2} [{}] {:>4} {:<9} {}",
            r.rank,
            r.timestamp_label,
            r.percent_label,
            r.bucket.label(),
            r.transcript
        );
    }
}
