//! Keyword classifier for note content.

use notes_types::Category;

struct Rule {
    keywords: &'static [&'static str],
    category: Category,
}

/// Evaluated in order; the first rule with any keyword present wins.
const RULES: [Rule; 6] = [
    Rule {
        keywords: &["merchant", "ba finance", "mit", "full auth"],
        category: Category::MerchantFinanced,
    },
    Rule {
        keywords: &["bnpl", "klarna", "aplazame", "psp"],
        category: Category::PartnerFinanced,
    },
    Rule {
        keywords: &["amadeus", "acquirer"],
        category: Category::AcquirerDriven,
    },
    Rule {
        keywords: &["deposit", "holidays", "deferred"],
        category: Category::DepositFlexible,
    },
    Rule {
        keywords: &["bank", "issuer"],
        category: Category::BankDriven,
    },
    Rule {
        keywords: &["hybrid", "routing", "orchestrat"],
        category: Category::SmartRouting,
    },
];

/// Pick a category for `content` by case-insensitive substring match.
///
/// When no keyword matches, `fallback` (a model context such as
/// "Merchant-Financed (MIT)") is resolved to a category, defaulting to
/// `General`.
pub fn classify(content: &str, fallback: Option<&str>) -> Category {
    let lower = content.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.category)
        .unwrap_or_else(|| fallback.map(Category::from_context).unwrap_or(Category::General))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule() {
        let cases = [
            ("Merchant pays the interest", Category::MerchantFinanced),
            ("BA Finance pilot", Category::MerchantFinanced),
            ("FULL AUTH at booking", Category::MerchantFinanced),
            ("BNPL at checkout", Category::PartnerFinanced),
            ("Aplazame for Spain", Category::PartnerFinanced),
            ("PSP hosted page", Category::PartnerFinanced),
            ("Amadeus plug-in", Category::AcquirerDriven),
            ("acquirer offers plans", Category::AcquirerDriven),
            ("Pay a deposit first", Category::DepositFlexible),
            ("Holidays package", Category::DepositFlexible),
            ("Deferred payment", Category::DepositFlexible),
            ("Bank app instalments", Category::BankDriven),
            ("Issuer side plans", Category::BankDriven),
            ("Hybrid approach", Category::SmartRouting),
            ("routing rules", Category::SmartRouting),
            ("Orchestration layer", Category::SmartRouting),
        ];

        for (content, expected) in cases {
            assert_eq!(classify(content, None), expected, "content: {}", content);
        }
    }

    #[test]
    fn test_precedence_first_rule_wins() {
        // Partner group ranks above the deposit group
        assert_eq!(classify("klarna partner deferred", None), Category::PartnerFinanced);
        assert_eq!(classify("bank routing", None), Category::BankDriven);
        assert_eq!(classify("acquirer with issuer", None), Category::AcquirerDriven);
        assert_eq!(classify("merchant via klarna", None), Category::MerchantFinanced);
    }

    #[test]
    fn test_mit_keyword() {
        assert_eq!(
            classify("MIT token consent flow", Some("Merchant-Financed (MIT)")),
            Category::MerchantFinanced
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify("Nothing to see here", None), Category::General);
        assert_eq!(classify("Nothing to see here", Some("Smart Routing")), Category::SmartRouting);
        assert_eq!(
            classify("Nothing to see here", Some("Merchant-Financed (MIT)")),
            Category::MerchantFinanced
        );
        assert_eq!(classify("Nothing to see here", Some("Landing page")), Category::General);
        assert_eq!(classify("", None), Category::General);
    }

    #[test]
    fn test_deterministic() {
        let content = "Deposit then issuer plan";
        assert_eq!(classify(content, None), classify(content, None));
    }
}
