//! Company credibility — a pure function of the profile's current state.
//!
//! Each populated descriptive field contributes a fixed number of points.
//! Because the score depends only on current field presence it self-heals on
//! every recomputation and cannot drift. It is recomputed and persisted on
//! every create/update of the profile; it does not react to job or
//! application activity.

const COMPANY_NAME_POINTS: i32 = 10;
const DESCRIPTION_POINTS: i32 = 20;
const INDUSTRY_POINTS: i32 = 15;
const LOCATION_POINTS: i32 = 15;
const LOGO_POINTS: i32 = 25;

/// Computes the credibility score from field presence. Whitespace-only
/// values count as absent.
pub fn credibility_score(
    company_name: &str,
    description: Option<&str>,
    industry: Option<&str>,
    location: Option<&str>,
    has_logo: bool,
) -> i32 {
    let mut score = 0;
    if present(Some(company_name)) {
        score += COMPANY_NAME_POINTS;
    }
    if present(description) {
        score += DESCRIPTION_POINTS;
    }
    if present(industry) {
        score += INDUSTRY_POINTS;
    }
    if present(location) {
        score += LOCATION_POINTS;
    }
    if has_logo {
        score += LOGO_POINTS;
    }
    score
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_profile() {
        assert_eq!(
            credibility_score("Acme", None, None, None, false),
            COMPANY_NAME_POINTS
        );
    }

    #[test]
    fn test_fully_populated_profile() {
        let score = credibility_score(
            "Acme",
            Some("We make anvils"),
            Some("Manufacturing"),
            Some("Berlin"),
            true,
        );
        assert_eq!(
            score,
            COMPANY_NAME_POINTS
                + DESCRIPTION_POINTS
                + INDUSTRY_POINTS
                + LOCATION_POINTS
                + LOGO_POINTS
        );
    }

    #[test]
    fn test_whitespace_counts_as_absent() {
        assert_eq!(
            credibility_score("Acme", Some("   "), Some(""), None, false),
            COMPANY_NAME_POINTS
        );
    }

    #[test]
    fn test_deterministic_for_identical_presence() {
        let a = credibility_score("Acme", Some("x"), None, Some("Berlin"), true);
        let b = credibility_score("Globex", Some("y"), None, Some("Tokyo"), true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let once = credibility_score("Acme", Some("x"), Some("y"), None, false);
        let twice = credibility_score("Acme", Some("x"), Some("y"), None, false);
        assert_eq!(once, twice);
    }
}
