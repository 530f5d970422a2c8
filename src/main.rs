mod budget;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod settings;
mod store;
mod template;
mod tui;
mod wizard;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands, CostsCommands, ProfessionalsCommands, ProjectsCommands};
use error::Result;

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Init { data_dir, demo } => cli::init::run(data_dir, demo),
        Commands::Status => cli::status::run(),
        Commands::Projects { command } => match command {
            ProjectsCommands::Add { name, vat_rate } => cli::projects::add(&name, vat_rate),
            ProjectsCommands::List => cli::projects::list(),
            ProjectsCommands::SetVat { name, rate } => cli::projects::set_vat(&name, rate),
        },
        Commands::Professionals { command } => match command {
            ProfessionalsCommands::Add {
                name,
                field,
                company,
                phone,
                email,
            } => cli::professionals::add(
                &name,
                &field,
                company.as_deref(),
                phone.as_deref(),
                email.as_deref(),
            ),
            ProfessionalsCommands::List => cli::professionals::list(),
        },
        Commands::Costs { command } => match command {
            CostsCommands::Add {
                name,
                project,
                estimated,
                quantity,
                unit_price,
                category,
                no_vat,
                description,
                notes,
            } => cli::costs::add(
                &project,
                &name,
                estimated,
                quantity,
                unit_price,
                category.as_deref(),
                no_vat,
                description.as_deref(),
                notes.as_deref(),
            ),
            CostsCommands::List { project } => cli::costs::list(&project),
            CostsCommands::Summary { project } => cli::costs::summary(&project),
            CostsCommands::SetActual {
                name,
                project,
                amount,
            } => cli::costs::set_actual(&project, &name, amount),
            CostsCommands::SetStatus {
                name,
                project,
                status,
            } => cli::costs::set_status(&project, &name, &status),
            CostsCommands::Delete { name, project } => cli::costs::delete(&project, &name),
            CostsCommands::Export { project, output } => {
                cli::costs::export(&project, output.as_deref())
            }
        },
        Commands::Import {
            file,
            project,
            professional,
            dry_run,
        } => cli::import::run(&file, &project, professional.as_deref(), dry_run),
        Commands::Wizard { project } => wizard::run(&project),
        Commands::Template { output } => cli::import::template(output.as_deref()),
        Commands::Demo => cli::demo::run(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "kablan", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
