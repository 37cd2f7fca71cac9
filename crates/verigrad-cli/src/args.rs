use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "verigrad", version, about = "VeriGrad diploma issuance CLI")]
pub struct Cli {
    /// Emit JSON output on stdout (no spinner, no colored status lines).
    #[arg(long, global = true)]
    pub json: bool,

    /// RPC endpoint (overrides VERIGRAD_RPC_URL).
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Issuer keypair file (overrides VERIGRAD_KEYPAIR).
    #[arg(long, global = true)]
    pub keypair: Option<String>,

    /// VeriGrad program id (overrides VERIGRAD_PROGRAM_ID).
    #[arg(long, global = true)]
    pub program_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Diploma form fields shared by `issue` and `record`.
#[derive(Args, Debug, Clone)]
pub struct FormArgs {
    #[arg(long)]
    pub student_name: String,

    /// Student wallet; defaults to the issuer.
    #[arg(long, alias = "recipient")]
    pub student_wallet: Option<String>,

    /// e.g. "Computer Science"
    #[arg(long)]
    pub degree_program: String,

    /// BSc, MSc, PhD, BA, MA
    #[arg(long)]
    pub degree_type: String,

    /// Defaults to the current year.
    #[arg(long)]
    pub year: Option<u16>,

    #[arg(long, default_value = "")]
    pub institution: String,

    #[arg(long)]
    pub gpa: Option<String>,

    #[arg(long)]
    pub honors: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mint a one-of-one diploma token to the student.
    Issue {
        #[command(flatten)]
        form: FormArgs,

        /// Send mint creation and minting as two transactions.
        #[arg(long)]
        split: bool,

        /// Attach a Token Metadata account.
        #[arg(long)]
        with_metadata: bool,
    },

    /// Record a diploma through the VeriGrad program.
    Record {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Show one diploma record by account address.
    Show { address: String },

    /// List diploma records of a student or an issuer.
    List {
        #[arg(long, conflicts_with = "issuer", required_unless_present = "issuer")]
        student: Option<String>,

        #[arg(long)]
        issuer: Option<String>,
    },

    /// Check that a holder owns an authentic diploma token.
    Verify {
        #[arg(long)]
        mint: String,

        #[arg(long)]
        holder: String,
    },

    /// Print the embedded program interface and its discriminators.
    Idl,

    /// Run configuration and endpoint checks.
    Doctor,
}
