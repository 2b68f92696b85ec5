//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Bernstein-Vazirani on simulators and quantum hardware",
        style("Kickback").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  kickback-ir       Circuit intermediate representation");
    println!("  kickback-qasm3    OpenQASM 3 emitter");
    println!("  kickback-hal      Hardware abstraction layer");
    println!("  kickback-bv       Oracle, circuit assembly and decoding");
    println!("  kickback-cli      Command-line interface");
    println!();
    println!("Backends:");
    println!("  simulator         Local statevector simulator");
    if cfg!(feature = "braket") {
        println!("  braket            AWS Braket simulators and QPUs");
    } else {
        println!("  braket            {}", style("not compiled").dim());
    }
    println!();
    println!("License: {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
