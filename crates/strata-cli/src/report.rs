use strata_migrate::{BatchReport, MigrationOutcome, MigrationStatus, SeederOutcome};

/// Print one line per migration followed by a summary.
pub fn print_migration_report(report: &BatchReport<MigrationOutcome>) {
    if report.is_empty() {
        println!("  No migrations registered.");
        return;
    }

    for (name, outcome) in report.iter() {
        let marker = match outcome {
            MigrationOutcome::Applied => "+",
            MigrationOutcome::Reverted => "-",
            MigrationOutcome::Skipped => " ",
            MigrationOutcome::Failed(_) => "!",
        };
        println!("  [{marker}] {name}: {outcome}");
    }

    println!();
    println!(
        "  {} applied, {} reverted, {} skipped, {} failed",
        report.applied().len(),
        report.reverted().len(),
        report.skipped().len(),
        report.failed().len()
    );
}

pub fn print_seeder_report(report: &BatchReport<SeederOutcome>) {
    let seeded = report.seeded();
    if seeded.is_empty() && !report.has_failures() {
        println!("  No seeders requested.");
        return;
    }

    for (name, outcome) in report.iter() {
        if *outcome != SeederOutcome::Skipped {
            println!("  {name}: {outcome}");
        }
    }
}

pub fn print_status(statuses: &[MigrationStatus]) {
    if statuses.is_empty() {
        println!("  No migrations registered.");
        return;
    }

    let width = statuses.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for status in statuses {
        let state = match (status.applied, status.registered) {
            (true, true) => "applied",
            (false, _) => "pending",
            (true, false) => "applied (not registered)",
        };
        println!("  {:<width$}  {state}", status.name);
    }
}
