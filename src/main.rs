use clap::Parser;
use env_logger::Env;
use itertools::Itertools;
use log::info;
use paraxial::{
    console::{Args, PartialArgs},
    error::{ParaxError, ParaxResult},
    OpticalSystem, ResultTable, SystemDocument,
};
use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};
use uom::si::length::millimeter;

/// Tolerance used for the determinant check of the loaded elements.
const DETERMINANT_TOLERANCE: f64 = 1e-9;

fn read_and_build_system(path: &Path) -> ParaxResult<OpticalSystem> {
    print!("\nReading system...");
    let _ = io::stdout().flush();
    let system = SystemDocument::from_file(path)?.build_system()?;
    println!("Success");
    Ok(system)
}

fn print_summary(system: &OpticalSystem) {
    print!("{system}");
    let matrix = system.system_matrix();
    println!("system matrix: {matrix}");
    match system.effective_focal_length() {
        Some(efl) => println!(
            "power: {:.6} 1/m, effective focal length: {:.6} mm",
            system.power(),
            efl.get::<millimeter>()
        ),
        None => println!("system is afocal"),
    }
    let suspicious = system.check_determinants(DETERMINANT_TOLERANCE);
    if !suspicious.is_empty() {
        println!(
            "elements with a determinant != 1: {}",
            suspicious.iter().map(|i| format!("#{i}")).join(", ")
        );
    }
}

fn write_csv(path: &Path, table: &ResultTable) -> ParaxResult<()> {
    print!("Write propagation result to {}...", path.display());
    let _ = io::stdout().flush();
    let output = File::create(path)
        .map_err(|e| ParaxError::Other(format!("csv file creation failed: {e}")))?;
    table.write_csv(output)?;
    println!("Success");
    Ok(())
}

fn main() -> ParaxResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    //parse CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;

    //read the system document and build the optical system
    let mut system = read_and_build_system(&args.file_path)?;
    print_summary(&system);

    //propagate all rays
    let table = system.propagate()?;
    info!(
        "propagation finished: {} ray(s) at {} plane(s)",
        table.num_rays(),
        table.num_planes()
    );
    println!("final ray states:");
    for (index, ray) in table.final_states().iter().enumerate() {
        println!("  ray {index}: {ray}");
    }

    //export the result table
    if let Some(csv_path) = &args.csv_path {
        write_csv(csv_path, table)?;
    }
    Ok(())
}
