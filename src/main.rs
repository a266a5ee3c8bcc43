use crate::algos::{Algo, Greedy};
use crate::config::Config;
use crate::loaders::{DelimitedLoader, Loader};
use crate::model::{Assignments, Group};
use clap::{ArgAction, Parser};
use eyre::{WrapErr, bail};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};

mod algos;
mod checks;
mod config;
mod display;
mod eligibility;
mod loaders;
mod model;
mod stats;
#[cfg(test)]
mod testing;

#[derive(Parser)]
#[command(version, author, about)]
struct Args {
    /// Use FILE instead of regroup.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Students file to fill, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Validation report destination, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,
    /// Do not write back results to the students file
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

fn write_report(path: &Path, assignments: &Assignments) -> eyre::Result<()> {
    let mut out = BufWriter::new(
        File::create(path).wrap_err_with(|| format!("cannot create {}", path.display()))?,
    );
    display::write_report(&mut out, assignments)
        .and_then(|()| out.flush())
        .wrap_err_with(|| format!("cannot write report {}", path.display()))
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default(
        args.config.as_deref().unwrap_or("regroup.toml".as_ref()),
        args.config.is_some(),
    )?;
    let input = args.input.unwrap_or_else(|| config.input.path.clone());
    let report = args.report.unwrap_or_else(|| config.report.path.clone());
    let mut loader = DelimitedLoader::new(
        input,
        config.delimiter()?,
        config.input.quoting,
        config.columns.clone(),
    );
    let students = loader.load()?;
    let mut assignments = Assignments::new(students, Group::standard_table());
    {
        let mut algo: Box<dyn Algo + '_> = match config.solver.algorithm.as_str() {
            "greedy" => Box::new(Greedy::new(&mut assignments)),
            other => bail!("unknown algorithm: {other}"),
        };
        algo.assign()?;
        info!(
            algorithm = %config.solver.algorithm,
            groups_in_use = algo
                .get_assignments()
                .filter_groups(|g| !algo.get_assignments().students_for(g).is_empty())
                .len(),
            "Assignment computed"
        );
    }
    checks::ensure_valid(&assignments)?;

    if args.dry_run {
        info!("Dry run, {} left untouched", loader.path().display());
    } else {
        loader.save(&assignments)?;
    }
    write_report(&report, &assignments)?;

    let total = assignments.students.len();
    let unassigned = assignments.unassigned_students().len();
    if unassigned > 0 {
        warn!(unassigned, "Some students could not be placed");
    }
    println!("Total students: {total}");
    println!("Assigned: {}", total - unassigned);
    println!("Unassigned: {unassigned}");
    println!("Report written to {}", report.display());
    Ok(())
}
