//! CLI definition using clap

use clap::{Args, Parser, Subcommand};

use crate::optional::OptionalValue;

#[derive(Parser)]
#[command(name = "fastly")]
#[command(version)]
#[command(about = "Manage Fastly service configuration")]
#[command(after_help = r#"
Examples:

  List services:
    fastly service list

  Create an ACL, cloning the active version first:
    fastly acl create --service-id SU1Z0isxPaozGVKXdv0eY --name blocklist --autoclone

  Add an entry to an ACL (ACL entries are not versioned):
    fastly acl-entry create --service-id SU1Z0isxPaozGVKXdv0eY --acl-id 6Dm3m7Pe --ip 10.0.0.0 --subnet 8

The service ID is taken from --service-id, --service-name, FASTLY_SERVICE_ID
or the service_id field of fastly.toml, in that order.
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Machine output (JSON Lines on stdout)
    #[arg(long, global = true)]
    pub json: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Fastly API token (falls back to FASTLY_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Fastly API endpoint (falls back to FASTLY_API_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Services - list and search
    Service(ServiceCommand),

    /// Service versions - list, clone, activate, deactivate, lock, update
    ServiceVersion(ServiceVersionCommand),

    /// Access control lists
    Acl(AclCommand),

    /// ACL entries (not versioned)
    AclEntry(AclEntryCommand),

    /// Edge dictionaries
    Dictionary(DictionaryCommand),

    /// Edge dictionary items (not versioned)
    DictionaryEntry(DictionaryEntryCommand),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Service(_) => "service",
            Commands::ServiceVersion(_) => "service-version",
            Commands::Acl(_) => "acl",
            Commands::AclEntry(_) => "acl-entry",
            Commands::Dictionary(_) => "dictionary",
            Commands::DictionaryEntry(_) => "dictionary-entry",
        }
    }
}

// ============ Shared flags ============

#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Service ID (falls back to FASTLY_SERVICE_ID, then fastly.toml)
    #[arg(short = 's', long = "service-id")]
    pub service_id: Option<String>,

    /// The name of the service
    #[arg(long = "service-name")]
    pub service_name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VersionArgs {
    /// 'latest', 'active', or the number of a specific version
    #[arg(long = "version", value_name = "VERSION")]
    pub version: Option<String>,
}

impl VersionArgs {
    pub fn version_flag(&self) -> OptionalValue<String> {
        self.version.clone().into()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AutoCloneArgs {
    /// If the selected version is active or locked, clone it and edit the clone
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub autoclone: Option<bool>,
}

impl AutoCloneArgs {
    pub fn flag(&self) -> OptionalValue<bool> {
        self.autoclone.into()
    }
}

// ============ Service Commands ============

#[derive(Args)]
pub struct ServiceCommand {
    #[command(subcommand)]
    pub action: ServiceAction,
}

#[derive(Subcommand)]
pub enum ServiceAction {
    /// List all services
    #[command(after_help = "Examples:
  fastly service list
  fastly service list --json")]
    List {
        /// Services per API page
        #[arg(long, default_value = "100")]
        per_page: u32,
    },

    /// Find a service by name
    #[command(after_help = "Examples:
  fastly service search --name www.example.com")]
    Search {
        /// Exact service name
        #[arg(short, long)]
        name: String,
    },
}

// ============ Service Version Commands ============

#[derive(Args)]
pub struct ServiceVersionCommand {
    #[command(subcommand)]
    pub action: ServiceVersionAction,
}

#[derive(Subcommand)]
pub enum ServiceVersionAction {
    /// List the versions of a service
    List {
        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Clone a version into a new editable version
    #[command(name = "clone")]
    #[command(after_help = "Examples:
  fastly service-version clone --service-id SU1Z0isxPaozGVKXdv0eY --version active")]
    CloneVersion {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
    },

    /// Activate a version
    Activate {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
    },

    /// Deactivate a version
    Deactivate {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
    },

    /// Lock a version so it can no longer be edited
    Lock {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
    },

    /// Update a version's comment
    #[command(after_help = "Examples:
  fastly service-version update --service-id SU1Z0isxPaozGVKXdv0eY --version latest --comment 'new origin' --autoclone")]
    Update {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,

        /// Human-readable comment
        #[arg(long)]
        comment: String,
    },
}

// ============ ACL Commands ============

#[derive(Args)]
pub struct AclCommand {
    #[command(subcommand)]
    pub action: AclAction,
}

#[derive(Subcommand)]
pub enum AclAction {
    /// Create a new ACL attached to a service version
    #[command(after_help = "Examples:
  fastly acl create --service-id SU1Z0isxPaozGVKXdv0eY --version latest --name blocklist --autoclone")]
    Create {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,

        /// Name for the ACL
        #[arg(short, long)]
        name: String,
    },

    /// Delete an ACL from a service version
    Delete {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,

        /// The name of the ACL to delete
        #[arg(short, long)]
        name: String,
    },

    /// Show an ACL
    Describe {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,

        /// The name of the ACL
        #[arg(short, long)]
        name: String,
    },

    /// List the ACLs of a service version
    List {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
    },

    /// Rename an ACL
    Update {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,

        /// The current name of the ACL
        #[arg(short, long)]
        name: String,

        /// The new name of the ACL
        #[arg(long)]
        new_name: String,
    },
}

// ============ ACL Entry Commands ============

#[derive(Args)]
pub struct AclEntryCommand {
    #[command(subcommand)]
    pub action: AclEntryAction,
}

#[derive(Subcommand)]
pub enum AclEntryAction {
    /// Add an IP address or subnet to an ACL
    #[command(after_help = "Examples:
  fastly acl-entry create --service-id SU1Z0isxPaozGVKXdv0eY --acl-id 6Dm3m7Pe --ip 192.168.0.1
  fastly acl-entry create --acl-id 6Dm3m7Pe --ip 10.0.0.0 --subnet 8 --negated")]
    Create {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// An IP address
        #[arg(long)]
        ip: String,

        /// Number of bits for the subnet mask applied to the IP address
        #[arg(long)]
        subnet: Option<u8>,

        /// Whether to negate the match
        #[arg(long)]
        negated: bool,

        /// A freeform descriptive note
        #[arg(long)]
        comment: Option<String>,
    },

    /// Remove an entry from an ACL
    Delete {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// ACL entry ID
        #[arg(long)]
        id: String,
    },

    /// List every entry of an ACL
    List {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// Entries per API page
        #[arg(long, default_value = "100")]
        per_page: u32,
    },
}

// ============ Dictionary Commands ============

#[derive(Args)]
pub struct DictionaryCommand {
    #[command(subcommand)]
    pub action: DictionaryAction,
}

#[derive(Subcommand)]
pub enum DictionaryAction {
    /// Create an edge dictionary on a service version
    Create {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,

        /// Name of the dictionary
        #[arg(short, long)]
        name: String,

        /// Hide dictionary items from the API and UI
        #[arg(long)]
        write_only: bool,
    },

    /// Delete an edge dictionary from a service version
    Delete {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,

        /// Name of the dictionary
        #[arg(short, long)]
        name: String,
    },

    /// List the edge dictionaries of a service version
    List {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        version: VersionArgs,
    },
}

// ============ Dictionary Entry Commands ============

#[derive(Args)]
pub struct DictionaryEntryCommand {
    #[command(subcommand)]
    pub action: DictionaryEntryAction,
}

#[derive(Subcommand)]
pub enum DictionaryEntryAction {
    /// Add an item to an edge dictionary
    Create {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Dictionary item key
        #[arg(long)]
        key: String,

        /// Dictionary item value
        #[arg(long)]
        value: String,
    },

    /// Remove an item from an edge dictionary
    Delete {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Dictionary item key
        #[arg(long)]
        key: String,
    },

    /// List every item of an edge dictionary
    List {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Items per API page
        #[arg(long, default_value = "100")]
        per_page: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fastly").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn autoclone_flag_forms() {
        let cases: [(&[&str], Option<bool>); 3] = [
            (&["acl", "create", "--name", "a"], None),
            (&["acl", "create", "--name", "a", "--autoclone"], Some(true)),
            (&["acl", "create", "--name", "a", "--autoclone=false"], Some(false)),
        ];
        for (args, expected) in cases {
            match parse(args).command {
                Some(Commands::Acl(AclCommand { action: AclAction::Create { autoclone, .. } })) => {
                    assert_eq!(autoclone.autoclone, expected, "{args:?}");
                    assert_eq!(autoclone.flag().was_set(), expected.is_some());
                }
                _ => panic!("unexpected parse for {args:?}"),
            }
        }
    }

    #[test]
    fn service_and_version_flags() {
        let cli = parse(&["acl", "list", "-s", "svc", "--service-name", "www", "--version", "active"]);
        match cli.command {
            Some(Commands::Acl(AclCommand { action: AclAction::List { service, version } })) => {
                assert_eq!(service.service_id.as_deref(), Some("svc"));
                assert_eq!(service.service_name.as_deref(), Some("www"));
                assert_eq!(version.version.as_deref(), Some("active"));
            }
            _ => panic!("unexpected parse"),
        }
    }
}
