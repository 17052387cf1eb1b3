//! Launch input validation. Pure, no I/O.
//!
//! Everything here runs before the anchor post is created, so an invalid
//! request never leaves an orphaned post behind.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Field, Violation};
use crate::types::LaunchRequest;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").expect("static regex"));
static WALLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("static regex"));

/// A request that passed every rule, with the symbol uppercased and the
/// community resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLaunch {
    pub name: String,
    pub symbol: String,
    pub wallet: String,
    pub description: String,
    pub image: String,
    pub community: String,
}

pub fn is_valid_symbol(symbol: &str) -> bool {
    SYMBOL_RE.is_match(symbol)
}

pub fn is_valid_wallet(wallet: &str) -> bool {
    WALLET_RE.is_match(wallet)
}

/// Check a launch request. Returns every violation, not just the first.
pub fn validate(req: &LaunchRequest, default_community: &str) -> Result<ValidLaunch, Vec<Violation>> {
    let mut violations = Vec::new();

    let name = req.name.trim();
    if name.is_empty() {
        violations.push(Violation::new(Field::Name, "is required"));
    } else if name.chars().count() > MAX_NAME_CHARS {
        violations.push(Violation::new(
            Field::Name,
            format!("must be at most {MAX_NAME_CHARS} characters"),
        ));
    }

    if !is_valid_symbol(&req.symbol) {
        violations.push(Violation::new(
            Field::Symbol,
            "must be 1-10 alphanumeric characters",
        ));
    }

    if !is_valid_wallet(&req.wallet) {
        violations.push(Violation::new(
            Field::Wallet,
            "must be 0x followed by 40 hex characters",
        ));
    }

    let description = req.description.trim();
    if description.is_empty() {
        violations.push(Violation::new(Field::Description, "is required"));
    } else if description.chars().count() > MAX_DESCRIPTION_CHARS {
        violations.push(Violation::new(
            Field::Description,
            format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }

    let image = req.image.trim();
    if image.is_empty() {
        violations.push(Violation::new(Field::Image, "is required"));
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    let community = req
        .community
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_community)
        .to_string();

    Ok(ValidLaunch {
        name: name.to_string(),
        symbol: req.symbol.to_ascii_uppercase(),
        wallet: req.wallet.clone(),
        description: description.to_string(),
        image: image.to_string(),
        community,
    })
}

/// Reject an empty value for a required caller-supplied credential or id.
pub fn require(field: Field, value: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        Err(Violation::new(field, "is required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LaunchRequest {
        LaunchRequest {
            name: "Reef Runner".into(),
            symbol: "reef".into(),
            wallet: format!("0x{}", "a".repeat(40)),
            description: "d".into(),
            image: "http://x/y.png".into(),
            community: None,
        }
    }

    fn fields(err: Vec<Violation>) -> Vec<Field> {
        err.into_iter().map(|v| v.field).collect()
    }

    #[test]
    fn valid_request_uppercases_symbol() {
        let ok = validate(&request(), "clawnch").unwrap();
        assert_eq!(ok.symbol, "REEF");
        assert_eq!(ok.community, "clawnch");
    }

    #[test]
    fn symbol_with_space_rejected() {
        let mut req = request();
        req.symbol = "R3 EF".into();
        assert_eq!(fields(validate(&req, "clawnch").unwrap_err()), [Field::Symbol]);
    }

    #[test]
    fn symbol_length_bounds() {
        assert!(is_valid_symbol("A"));
        assert!(is_valid_symbol("ABCDEFGHIJ"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("ABCDEFGHIJK"));
        assert!(!is_valid_symbol("$REEF"));
    }

    #[test]
    fn wallet_rules() {
        assert!(is_valid_wallet("0xABCDEF0123456789abcdef0123456789abcdef01"));
        assert!(!is_valid_wallet("0x123"));
        assert!(!is_valid_wallet("ABCDEF0123456789abcdef0123456789abcdef0123"));
        assert!(!is_valid_wallet("0xGBCDEF0123456789abcdef0123456789abcdef01"));
    }

    #[test]
    fn name_and_description_limits_count_chars() {
        let mut req = request();
        req.name = "é".repeat(MAX_NAME_CHARS);
        req.description = "x".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate(&req, "clawnch").is_ok());

        req.name = "n".repeat(MAX_NAME_CHARS + 1);
        req.description = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert_eq!(
            fields(validate(&req, "clawnch").unwrap_err()),
            [Field::Name, Field::Description]
        );
    }

    #[test]
    fn reports_every_violation() {
        let req = LaunchRequest::default();
        assert_eq!(
            fields(validate(&req, "clawnch").unwrap_err()),
            [
                Field::Name,
                Field::Symbol,
                Field::Wallet,
                Field::Description,
                Field::Image
            ]
        );
    }

    #[test]
    fn explicit_community_wins_over_default() {
        let mut req = request();
        req.community = Some("memes".into());
        assert_eq!(validate(&req, "clawnch").unwrap().community, "memes");
        req.community = Some("  ".into());
        assert_eq!(validate(&req, "clawnch").unwrap().community, "clawnch");
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require(Field::PostId, "p_1").is_ok());
        assert_eq!(require(Field::AgentKey, " ").unwrap_err().field, Field::AgentKey);
    }
}
