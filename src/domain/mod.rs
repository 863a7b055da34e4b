//! Domain extraction and normalization utilities.
//!
//! This module resolves raw hosts or URLs to registrable domains using the
//! Public Suffix List (PSL). Every domain used as a cache or database key comes
//! out of [`DomainResolver`], so keys are always lower-cased and never contain
//! a subdomain, a port, or an IP literal.
//!
//! Key functions:
//! - `resolve()` - Registrable domain, main domain and suffix for a host or URL
//! - `DomainResolver::require()` - Same, but an unresolvable input is an error

use psl::{List, Psl, Type};
use url::{Host, Url};

use crate::error_handling::DomainError;

/// Options controlling how suffixes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// When true, private PSL entries (e.g. `github.io`) count as public
    /// suffixes, so `user.github.io` is its own registrable domain.
    pub allow_private_domains: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            allow_private_domains: true,
        }
    }
}

/// Outcome of resolving a host or URL.
///
/// An absent `registrable_domain` means the page cannot be scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Registrable domain, e.g. `example.co.uk`
    pub registrable_domain: Option<String>,
    /// Registrable domain without its suffix, e.g. `example`
    pub main_domain: Option<String>,
    /// Public suffix the registrable domain sits under, e.g. `co.uk`
    pub suffix: Option<String>,
}

impl Resolution {
    /// Returns true when a registrable domain was found.
    pub fn is_resolved(&self) -> bool {
        self.registrable_domain.is_some()
    }
}

/// Resolves hosts and URLs with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainResolver {
    options: ResolveOptions,
}

impl DomainResolver {
    /// Creates a resolver with the given options.
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// Returns the options this resolver was built with.
    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Resolves a raw host or URL. Never fails; see [`Resolution`].
    pub fn resolve(&self, raw: &str) -> Resolution {
        resolve(raw, self.options)
    }

    /// Returns only the registrable domain of `raw`, if any.
    pub fn registrable_domain(&self, raw: &str) -> Option<String> {
        self.resolve(raw).registrable_domain
    }

    /// Resolves `raw`, treating an absent registrable domain as an error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDomain` if the input has no registrable domain.
    pub fn require(&self, raw: &str) -> Result<Resolution, DomainError> {
        let resolution = self.resolve(raw);
        if resolution.is_resolved() {
            Ok(resolution)
        } else {
            Err(DomainError::InvalidDomain(raw.to_string()))
        }
    }
}

/// Resolves a raw host or URL to its registrable domain.
///
/// Accepts full URLs (`https://sub.example.com:8080/path`) as well as bare hosts
/// (`sub.example.com`, `example.com/path`). Returns an empty [`Resolution`] for
/// IP literals, single-label hosts, hosts that are themselves a public suffix,
/// and anything `url` cannot parse.
pub fn resolve(raw: &str, options: ResolveOptions) -> Resolution {
    let Some(host) = extract_host(raw) else {
        return Resolution::default();
    };
    let Some((domain, suffix)) = registrable_parts(&host, options.allow_private_domains) else {
        return Resolution::default();
    };

    let main_domain = domain
        .strip_suffix(suffix.as_str())
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string);

    Resolution {
        registrable_domain: Some(domain),
        main_domain,
        suffix: Some(suffix),
    }
}

/// Pulls a lower-cased hostname out of a URL or bare host string.
fn extract_host(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Bare hosts are parsed as http URLs so ports and paths are stripped the same way
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed).ok()?
    } else {
        Url::parse(&format!("http://{trimmed}")).ok()?
    };

    // IP addresses do not have registrable domains
    match parsed.host()? {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.');
            if domain.is_empty() {
                None
            } else {
                Some(domain.to_ascii_lowercase())
            }
        }
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Splits `host` into (registrable domain, suffix).
fn registrable_parts(host: &str, allow_private: bool) -> Option<(String, String)> {
    if !allow_private {
        if let Some(suffix) = List.suffix(host.as_bytes()) {
            if matches!(suffix.typ(), Some(Type::Private)) {
                let private = std::str::from_utf8(suffix.as_bytes()).ok()?;
                let icann = icann_suffix_of(private)?;
                return registrable_under(host, icann);
            }
        }
    }

    let domain = List.domain(host.as_bytes())?;
    let registrable = std::str::from_utf8(domain.as_bytes()).ok()?.to_string();
    let suffix = std::str::from_utf8(domain.suffix().as_bytes())
        .ok()?
        .to_string();
    Some((registrable, suffix))
}

/// Finds the longest non-private suffix contained in a private suffix
/// (`github.io` -> `io`, `blogspot.co.uk` -> `co.uk`).
fn icann_suffix_of(private_suffix: &str) -> Option<&str> {
    let mut rest = private_suffix;
    while let Some((_, tail)) = rest.split_once('.') {
        if let Some(found) = List.suffix(tail.as_bytes()) {
            if !matches!(found.typ(), Some(Type::Private)) && found.as_bytes() == tail.as_bytes()
            {
                return Some(tail);
            }
        }
        rest = tail;
    }
    None
}

/// Builds the registrable domain of `host` directly under `suffix`.
fn registrable_under(host: &str, suffix: &str) -> Option<(String, String)> {
    let prefix = host.strip_suffix(suffix)?.strip_suffix('.')?;
    let label = prefix.rsplit('.').next().filter(|label| !label.is_empty())?;
    Some((format!("{label}.{suffix}"), suffix.to_string()))
}
