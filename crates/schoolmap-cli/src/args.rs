use clap::{Parser, Subcommand};

/// CLI arguments for schoolmap
#[derive(Debug, Parser)]
#[command(
    name = "schoolmap",
    version,
    about = "Inspect and filter a school directory and keep its geocode cache in shape"
)]
pub struct CliArgs {
    /// Directory JSON: an array of {"name", "schools"} items (or {"City": [..]} pairs)
    #[arg(short = 'd', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Geocode cache document (default: `json_file` from the settings)
    #[arg(short = 'c', long = "cache", global = true)]
    pub cache: Option<String>,

    /// Settings JSON, same keys as the page script object
    #[arg(short = 's', long = "settings", global = true)]
    pub settings: Option<String>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the directory (and of the cache, if one is given)
    Stats,

    /// Apply a filter query and print what stays visible
    Filter {
        /// Literal, case-sensitive query
        query: String,

        /// Keep non-matching schools of a city that matched through a school
        #[arg(long)]
        show_siblings: bool,

        /// Print the directory view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a city in the geocode cache
    Lookup {
        /// City name (compared trimmed and exact)
        name: String,
    },

    /// List the cities a map looking at the given region would show
    InView {
        #[arg(allow_negative_numbers = true)]
        south: f64,
        #[arg(allow_negative_numbers = true)]
        west: f64,
        #[arg(allow_negative_numbers = true)]
        north: f64,
        #[arg(allow_negative_numbers = true)]
        east: f64,

        /// Map center latitude (default: middle of the region)
        #[arg(long, requires = "center_lng", allow_negative_numbers = true)]
        center_lat: Option<f64>,

        /// Map center longitude
        #[arg(long, requires = "center_lat", allow_negative_numbers = true)]
        center_lng: Option<f64>,
    },

    /// Format a marker description into popup HTML
    Popup {
        /// Raw description (fields separated by <br>)
        description: String,

        /// Feature name shown as the popup header
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Store an endpoint payload (`newData`) into the cache file
    Persist {
        /// File holding the payload, or `-` for stdin
        payload: String,
    },

    /// Geocode directory cities missing from the cache and append them
    #[cfg(feature = "http")]
    Reconcile {
        /// Geocoding API key
        #[arg(long, env = "SCHOOLMAP_GEOCODE_KEY")]
        api_key: String,

        /// Result language, e.g. `he`
        #[arg(long, default_value = "he")]
        language: String,

        /// Region bias, e.g. `IL`
        #[arg(long, default_value = "IL")]
        region: String,

        /// Only list the missing cities
        #[arg(long)]
        dry_run: bool,
    },
}
