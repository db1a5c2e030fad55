//! # Fast-Path Matcher
//!
//! Deterministic first stage of a content check. Every rule in the resolved
//! pack is tested against the full content; the descriptions of all matching
//! rules are returned in rule order.
//!
//! Matching is synchronous and cannot fail: patterns were compiled when the
//! pack was loaded, and the `regex` crate matches in time linear in the
//! content length.

use cpe_pack::CompiledPack;

/// Descriptions of every rule in `pack` that `content` violates.
///
/// An empty pack always yields an empty vector.
pub fn match_content(pack: &CompiledPack, content: &str) -> Vec<String> {
    pack.rules()
        .iter()
        .filter(|rule| rule.matches(content))
        .map(|rule| rule.description().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpe_core::{Channel, JurisdictionId};
    use cpe_pack::{PackStatus, Rule, RulePack};

    fn pack(rules: Vec<Rule>) -> CompiledPack {
        RulePack {
            jurisdiction: JurisdictionId::new("NY").unwrap(),
            channel: Channel::retail(),
            version: 1,
            status: PackStatus::Passing,
            rules,
        }
        .compile()
        .unwrap()
    }

    fn regex(pattern: &str, description: &str) -> Rule {
        Rule::Regex {
            pattern: pattern.into(),
            description: description.into(),
        }
    }

    #[test]
    fn empty_pack_matches_nothing() {
        let p = CompiledPack::empty(JurisdictionId::new("ZZ").unwrap(), Channel::retail());
        assert!(match_content(&p, "guaranteed relief that will heal you").is_empty());
    }

    #[test]
    fn reports_every_match_in_rule_order() {
        let p = pack(vec![
            regex("guaranteed relief", "Guaranteed outcome"),
            regex("no match here", "Unused"),
            regex(r"\bheal", "Medical claim"),
        ]);
        let v = match_content(&p, "Heal fast with guaranteed relief");
        assert_eq!(v, vec!["Guaranteed outcome", "Medical claim"]);
    }

    #[test]
    fn case_insensitive() {
        let p = pack(vec![regex("guaranteed relief", "Guaranteed outcome")]);
        assert_eq!(
            match_content(&p, "GUARANTEED RELIEF"),
            match_content(&p, "guaranteed relief")
        );
        assert_eq!(match_content(&p, "GuArAnTeEd ReLiEf").len(), 1);
    }

    #[test]
    fn keyword_and_regex_rules_mix() {
        let p = pack(vec![
            regex("guaranteed relief", "Guaranteed outcome"),
            Rule::Keywords {
                keywords: vec!["kids".into()],
                description: "Appeals to minors".into(),
            },
        ]);
        let v = match_content(&p, "Great for KIDS");
        assert_eq!(v, vec!["Appeals to minors"]);
    }

    #[test]
    fn clean_content_yields_nothing() {
        let p = pack(vec![regex("guaranteed relief", "Guaranteed outcome")]);
        assert!(match_content(&p, "Open daily 9am to 9pm").is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Upper- or lower-casing content never changes the fast-path outcome.
            #[test]
            fn casing_never_changes_outcome(
                prefix in "[a-zA-Z ]{0,20}",
                suffix in "[a-zA-Z ]{0,20}",
                include in any::<bool>(),
            ) {
                let p = pack(vec![
                    regex("guaranteed relief", "Guaranteed outcome"),
                    Rule::Keywords {
                        keywords: vec!["heal".into()],
                        description: "Medical claim".into(),
                    },
                ]);
                let middle = if include { " guaranteed relief " } else { " " };
                let content = format!("{prefix}{middle}{suffix}");
                let base = match_content(&p, &content);
                prop_assert_eq!(&base, &match_content(&p, &content.to_uppercase()));
                prop_assert_eq!(&base, &match_content(&p, &content.to_lowercase()));
                if include {
                    prop_assert!(base.contains(&"Guaranteed outcome".to_string()));
                }
            }
        }
    }
}
