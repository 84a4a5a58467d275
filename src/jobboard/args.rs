use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jobboard")]
#[command(about = "Local-first job board: post jobs, keep CVs, apply", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the board's data (overrides JOBBOARD_HOME)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// My activity: postings, CVs and applications
    #[command(alias = "dash")]
    Dashboard,

    /// Browse job postings
    #[command(alias = "ls", alias = "list")]
    Jobs {
        /// Match title, description or company
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category ("All Categories" matches everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Match location
        #[arg(short, long)]
        location: Option<String>,

        /// Only my own postings
        #[arg(long)]
        mine: bool,
    },

    /// Post a new job
    Post {
        #[arg(long)]
        title: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        location: String,

        #[arg(long, default_value = "")]
        salary: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        description: String,

        /// Repeat for each requirement
        #[arg(short = 'r', long = "requirement", num_args = 1)]
        requirements: Vec<String>,
    },

    /// Show one job posting
    #[command(alias = "v")]
    Show { job_id: String },

    /// Delete one of my job postings and its applications
    #[command(alias = "rm")]
    DeleteJob { job_id: String },

    /// Manage CV documents
    Cv {
        #[command(subcommand)]
        action: CvCommands,
    },

    /// Apply to a job with one of my CVs
    Apply {
        job_id: String,

        /// Id of the CV to attach
        #[arg(long)]
        cv: String,

        /// Optional cover letter
        #[arg(long)]
        cover_letter: Option<String>,
    },

    /// List my applications
    Applications,

    /// List applications received for one of my jobs
    Applicants { job_id: String },

    /// Withdraw one of my pending applications
    Withdraw { application_id: String },

    /// Set the status of an application to one of my jobs
    Status {
        application_id: String,

        /// pending, reviewed, accepted or rejected
        status: String,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., max-document-bytes)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CvCommands {
    /// Upload a PDF or DOCX file
    Upload { path: PathBuf },

    /// List my CVs
    #[command(alias = "ls")]
    List,

    /// Delete one of my CVs
    #[command(alias = "rm")]
    Delete { document_id: String },

    /// Write a CV back to disk
    Export {
        document_id: String,

        /// Target file or directory (defaults to the current directory)
        #[arg(default_value = ".")]
        target: PathBuf,
    },
}
