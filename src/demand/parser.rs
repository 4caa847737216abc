//! Demand config string parsing.
//!
//! A config string is a whitespace-separated list of tokens. Each token is
//! either `H:R` or `H:RxM`, where `H` is the initial host count, `R` the
//! reserve in percent and `M` the number of identical subnets to plan.
//! The `x` separator is case-insensitive.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum number of subnets a plan must contain after multiplier expansion
pub const MIN_DEMANDS: usize = 2;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d+)(?:[xX](\d+))?$").expect("Invalid demand token regex")
});

/// Errors that can occur while parsing a demand config string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemandError {
    #[error("Malformed demand token '{token}' (expected H:R or H:RxM with H >= 1, R >= 0, M >= 1)")]
    MalformedToken { token: String },

    #[error("Provide at least 2 subnet demands, got {count}")]
    InsufficientDemandCount { count: usize },
}

/// One token of the config string, before multiplier expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandGroup {
    pub initial_hosts: u32,
    pub reserve_percent: u32,
    pub multiplier: u32,
}

impl DemandGroup {
    /// Parse a single `H:R` or `H:RxM` token
    pub fn parse(token: &str) -> Result<Self, DemandError> {
        let malformed = || DemandError::MalformedToken {
            token: token.to_string(),
        };

        let caps = TOKEN_PATTERN.captures(token).ok_or_else(malformed)?;

        // Digits that overflow u32 are as unusable as any other bad token
        let initial_hosts: u32 = caps[1].parse().map_err(|_| malformed())?;
        let reserve_percent: u32 = caps[2].parse().map_err(|_| malformed())?;
        let multiplier: u32 = match caps.get(3) {
            Some(m) => m.as_str().parse().map_err(|_| malformed())?,
            None => 1,
        };

        if initial_hosts == 0 || multiplier == 0 {
            return Err(malformed());
        }

        Ok(DemandGroup {
            initial_hosts,
            reserve_percent,
            multiplier,
        })
    }

    /// Expand this group into `multiplier` unit demands tagged with `group`
    pub fn expand(&self, group: usize) -> impl Iterator<Item = Demand> + '_ {
        (0..self.multiplier).map(move |_| Demand {
            initial_hosts: self.initial_hosts,
            reserve_percent: self.reserve_percent,
            group,
        })
    }
}

/// A single subnet request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    /// Hosts the subnet must hold today
    pub initial_hosts: u32,
    /// Extra capacity for growth, in percent of `initial_hosts`
    pub reserve_percent: u32,
    /// 1-based position of the config token this demand came from
    pub group: usize,
}

impl Demand {
    pub fn new(initial_hosts: u32, reserve_percent: u32) -> Self {
        Demand {
            initial_hosts,
            reserve_percent,
            group: 1,
        }
    }
}

/// Parse the tokens of a config string without expanding multipliers.
///
/// An empty config string yields an empty list; the demand count check is
/// done by [`parse_demands`].
pub fn parse_groups(config: &str) -> Result<Vec<DemandGroup>, DemandError> {
    config.split_whitespace().map(DemandGroup::parse).collect()
}

/// Parse a config string into unit demands, in input order.
///
/// # Examples
/// ```
/// use vlsmplan::demand::parse_demands;
///
/// let demands = parse_demands("40:300 10:100x2").unwrap();
/// assert_eq!(demands.len(), 3);
/// assert_eq!(demands[2].group, 2);
/// assert!(parse_demands("42:42").is_err());
/// ```
pub fn parse_demands(config: &str) -> Result<Vec<Demand>, DemandError> {
    let groups = parse_groups(config)?;

    let demands: Vec<Demand> = groups
        .iter()
        .enumerate()
        .flat_map(|(index, group)| group.expand(index + 1))
        .collect();

    if demands.len() < MIN_DEMANDS {
        return Err(DemandError::InsufficientDemandCount {
            count: demands.len(),
        });
    }

    log::debug!(
        "Parsed {} demand group(s) into {} subnet demand(s)",
        groups.len(),
        demands.len()
    );
    Ok(demands)
}
