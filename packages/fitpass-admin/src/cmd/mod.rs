//! Admin tasks, one per binary.

pub mod analyze;
pub mod manual;
pub mod update;
pub mod verify;

use table_store::TableStore;

use crate::context::AppContext;
use crate::report::{sweep_line, sweep_summary};
use crate::sweep::{sweep_dangling_bookings, SweepReport, Verdict};

/// Run the booking sweep and print what it did.
///
/// `show_valid` also lists the bookings that were kept. Returns `None`
/// when the sweep could not read its inputs.
pub(crate) async fn clean_bookings<S: TableStore>(
    ctx: &AppContext<S>,
    show_valid: bool,
) -> Option<SweepReport> {
    ctx.print_step("Checking bookings against classes...");

    let report = match sweep_dangling_bookings(&ctx.store).await {
        Ok(report) => report,
        Err(e) => {
            ctx.print_error(&format!("Error cleaning bookings: {e}"));
            return None;
        }
    };

    let ids: Vec<String> = report.parent_ids.iter().map(ToString::to_string).collect();
    ctx.print_info(&format!(
        "Found {} valid class IDs: [{}]",
        ids.len(),
        ids.join(", ")
    ));
    ctx.print_info(&format!("Found {} bookings to check", report.children_read()));

    for checked in &report.checked {
        match checked.verdict {
            Verdict::Valid if show_valid => ctx.print_success(&sweep_line(checked)),
            Verdict::Valid => {}
            Verdict::Deleted => {
                ctx.print_warning(&format!("Invalid booking {}", sweep_line(checked)))
            }
            Verdict::NothingMatched | Verdict::DeleteFailed(_) => {
                ctx.print_error(&format!("Invalid booking {}", sweep_line(checked)))
            }
        }
    }

    if report.is_clean() {
        ctx.print_success(&sweep_summary(&report));
    } else {
        ctx.print_warning(&sweep_summary(&report));
    }
    Some(report)
}
