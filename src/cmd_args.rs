use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Required. Profile section to read client credentials from.
    /// If the profile is not configured, the run fails with a hint.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Authorization code obtained from the OAuth redirect URL
    #[clap(long, help = "authorization code to exchange for a token")]
    auth_code: Option<String>,

    /// Number of feed pages to fetch after login
    #[clap(long, default_value = "1", help = "number of feed pages to fetch")]
    pages: u32,

    /// Toggle the like state of the photo at this index after fetching
    #[clap(long, help = "feed index of a photo to like or unlike")]
    like: Option<usize>,

    /// Forget the stored token and tear down the session
    #[clap(long, help = "log out and clear the stored token")]
    logout: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    auth_code: Option<String>,
    pages: u32,
    like: Option<usize>,
    logout: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            auth_code: args.auth_code,
            pages: args.pages,
            like: args.like,
            logout: args.logout,
        }
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn auth_code(&self) -> Option<&String> {
        self.auth_code.as_ref()
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn like(&self) -> Option<usize> {
        self.like
    }

    pub fn logout(&self) -> bool {
        self.logout
    }
}
