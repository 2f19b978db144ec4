//! List checks command implementation.

use manilint_checks::{all_checks, CheckInfo};

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks (in run order):\n");
    println!("{:<8} {:<18} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(80));

    for check in &all_checks() {
        let info = CheckInfo::of(check);
        println!(
            "{:<8} {:<18} {:<9} {}",
            info.code,
            info.name,
            info.severity.to_string(),
            info.description
        );
    }

    println!("\nUse --only / --disable to choose checks, e.g.:");
    println!("  manilint check --only arrow-alignment");
    println!("  manilint check --disable ML001 --fix");
    println!("\nSuppress a check inline with `# lint:ignore:<name>`.");
}
