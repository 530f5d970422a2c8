pub mod costs;
pub mod demo;
pub mod import;
pub mod init;
pub mod professionals;
pub mod projects;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "kablan", about = "Construction project cost tracking CLI.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Kablan: choose a data directory and storage mode.
    Init {
        /// Path for Kablan data (default: ~/Documents/kablan)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Use demo mode: a single JSON document instead of a database.
        #[arg(long)]
        demo: bool,
    },
    /// Show settings, backend, and entity counts.
    Status,
    /// Manage projects.
    Projects {
        #[command(subcommand)]
        command: ProjectsCommands,
    },
    /// Manage professionals (consultants, suppliers, contractors).
    Professionals {
        #[command(subcommand)]
        command: ProfessionalsCommands,
    },
    /// Manage cost items within a project.
    Costs {
        #[command(subcommand)]
        command: CostsCommands,
    },
    /// Import cost items from an XLSX spreadsheet.
    Import {
        /// Path to the spreadsheet file
        file: String,
        /// Project name to import into
        #[arg(long)]
        project: String,
        /// Professional associated with this import (provenance only)
        #[arg(long)]
        professional: Option<String>,
        /// Parse and preview only; commit nothing
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Interactive three-step import wizard.
    Wizard {
        /// Project name to import into
        #[arg(long)]
        project: String,
    },
    /// Write the XLSX import template.
    Template {
        /// Output path (default: cost-items-template.xlsx)
        output: Option<String>,
    },
    /// Load sample data (project, professionals, cost items) to explore Kablan.
    Demo,
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// Add a new project.
    Add {
        /// Project name, e.g. 'Herzl 12 Renovation'
        name: String,
        /// VAT rate applied to imported items (default from settings)
        #[arg(long = "vat-rate")]
        vat_rate: Option<f64>,
    },
    /// List all projects.
    List,
    /// Change a project's VAT rate.
    SetVat {
        /// Project name
        name: String,
        /// New VAT rate, e.g. 0.17
        rate: f64,
    },
}

#[derive(Subcommand)]
pub enum ProfessionalsCommands {
    /// Add a new professional.
    Add {
        /// Professional name
        name: String,
        /// Field of work, e.g. 'electrical'
        #[arg(long)]
        field: String,
        /// Company name
        #[arg(long)]
        company: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Email address
        #[arg(long)]
        email: Option<String>,
    },
    /// List all professionals.
    List,
}

#[derive(Subcommand)]
pub enum CostsCommands {
    /// Add a cost item. Give --estimated, or --quantity with --unit-price.
    Add {
        /// Item name
        name: String,
        /// Project name
        #[arg(long)]
        project: String,
        /// Estimated amount
        #[arg(long)]
        estimated: Option<f64>,
        /// Quantity (with --unit-price, derives the estimated amount)
        #[arg(long)]
        quantity: Option<f64>,
        /// Unit price (with --quantity, derives the estimated amount)
        #[arg(long = "unit-price")]
        unit_price: Option<f64>,
        /// Category: consultant, supplier, contractor, agra
        #[arg(long)]
        category: Option<String>,
        /// Amount does not include VAT
        #[arg(long = "no-vat")]
        no_vat: bool,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List a project's cost items with estimate-vs-actual variance.
    List {
        /// Project name
        #[arg(long)]
        project: String,
    },
    /// Per-category totals and the VAT breakdown.
    Summary {
        /// Project name
        #[arg(long)]
        project: String,
    },
    /// Record the actual amount paid for an item.
    SetActual {
        /// Item name
        name: String,
        /// Project name
        #[arg(long)]
        project: String,
        /// Actual amount paid
        amount: f64,
    },
    /// Move an item through its lifecycle.
    SetStatus {
        /// Item name
        name: String,
        /// Project name
        #[arg(long)]
        project: String,
        /// Status: draft, tender_draft, tender_open, tender_winner
        status: String,
    },
    /// Delete an item.
    Delete {
        /// Item name
        name: String,
        /// Project name
        #[arg(long)]
        project: String,
    },
    /// Export a project's cost items to CSV.
    Export {
        /// Project name
        #[arg(long)]
        project: String,
        /// Output file path (default: <project>-costs.csv)
        #[arg(long)]
        output: Option<String>,
    },
}
