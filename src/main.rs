mod cli;
mod db;
mod error;
mod exporter;
mod filter;
mod fmt;
mod importer;
mod models;
mod payroll;
#[cfg(feature = "pdf")]
mod pdf;
mod reports;
mod settings;
mod stats;
mod store;

use clap::{CommandFactory, Parser};

use cli::{CategoriesCommands, Cli, Commands, ExportCommands, PayrollCommands, ReportCommands, StaffCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            data_dir,
            church_name,
        } => cli::init::run(data_dir, church_name),
        Commands::Add {
            date,
            contributor,
            amount,
            tx_type,
            category,
            description,
            status,
        } => cli::transactions::add(
            date.as_deref(),
            &contributor,
            amount,
            &tx_type,
            &category,
            description.as_deref(),
            status.as_deref(),
        ),
        Commands::Edit {
            id,
            date,
            contributor,
            amount,
            tx_type,
            category,
            description,
            status,
        } => cli::transactions::edit(
            id,
            date,
            contributor,
            amount,
            tx_type.as_deref(),
            category,
            description,
            status.as_deref(),
        ),
        Commands::Delete { id } => cli::transactions::delete(id),
        Commands::History { filter, page } => cli::transactions::history(&filter, page),
        Commands::Report { command } => match command {
            ReportCommands::Summary => cli::report::summary(),
            ReportCommands::Categories => cli::report::categories(),
            ReportCommands::Chart => cli::report::chart(),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Rename {
                old,
                name,
                tx_type,
                description,
            } => cli::categories::rename(&old, &name, &tx_type, description.as_deref()),
            CategoriesCommands::Delete { name, yes } => cli::categories::delete(&name, yes),
        },
        Commands::Staff { command } => match command {
            StaffCommands::Add {
                name,
                role,
                department,
            } => cli::staff::add(&name, &role, department.as_deref()),
            StaffCommands::List => cli::staff::list(),
        },
        Commands::Payroll { command } => match command {
            PayrollCommands::Add {
                staff,
                month,
                basic,
                allowances,
                deductions,
            } => cli::payroll::add(staff, month.as_deref(), basic, allowances, deductions),
            PayrollCommands::List {
                month,
                search,
                status,
            } => cli::payroll::list(month.as_deref(), search.as_deref(), status.as_deref()),
            PayrollCommands::Pay { id } => cli::payroll::pay(id),
            PayrollCommands::Summary { month } => cli::payroll::summary(month.as_deref()),
        },
        Commands::Export { command } => match command {
            ExportCommands::Csv { filter, output } => cli::export::csv(&filter, output),
            #[cfg(feature = "pdf")]
            ExportCommands::History { filter, output } => cli::export::history(&filter, output),
            #[cfg(feature = "pdf")]
            ExportCommands::Receipts { ids, output } => cli::export::receipts(&ids, output),
            #[cfg(feature = "pdf")]
            ExportCommands::Report { filter, output } => cli::export::report(&filter, output),
            #[cfg(feature = "pdf")]
            ExportCommands::Payslips { month, output } => {
                cli::export::payslips(month.as_deref(), output)
            }
        },
        Commands::Import { file, format } => cli::import::run(&file, format.as_deref()),
        Commands::Demo => cli::demo::run(),
        Commands::Backup { output } => cli::backup::run(output),
        Commands::Status => cli::status::run(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "steward", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
