mod apply;
mod scan;
mod serve;

pub use apply::{run_apply, ApplyTarget};
pub use scan::run_scan;
pub use serve::run_serve;

use dsa_lib::Document;

/// Host notifications go to stderr so stdout stays machine readable.
fn print_notifications(document: &Document) {
    for message in document.take_notifications() {
        eprintln!("{message}");
    }
}
