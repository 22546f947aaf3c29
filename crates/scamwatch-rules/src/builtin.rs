//! Built-in scam pattern table.
//!
//! Each entry is `(tag, weight, pattern, explanation)`. Patterns are compiled
//! case-insensitively by [`RuleTableBuilder::build`](crate::RuleTableBuilder::build).

use crate::errors::Result;
use crate::table::{RuleSpec, RuleTable};

/// Declarative built-in rules, in audit order.
pub const BUILTIN_RULES: &[(&str, i64, &str, &str)] = &[
    // Pressure and urgency
    (
        "urgency",
        18,
        r"\b(urgent|immediately|right now|now|asap|don't delay|this minute)\b",
        "The caller is creating a false sense of urgency",
    ),
    (
        "deadline",
        12,
        r"\bbefore\b.*\b(end of day|today|tomorrow)\b",
        "The caller is imposing an artificial deadline to pressure you",
    ),
    // Payment requests
    (
        "money_transfer",
        20,
        r"\b(wire( a)? transfer|bank transfer|wire money|send (money|funds)|transfer (funds|money))\b",
        "The caller is requesting a wire transfer or money movement",
    ),
    (
        "gift_card",
        22,
        r"\b(gift cards?|itunes cards?|google play cards?|amazon gift cards?|prepaid cards?)\b",
        "The caller is requesting payment via gift cards, a common scam tactic",
    ),
    (
        "crypto",
        20,
        r"\b(bitcoin|crypto|cryptocurrency|ethereum|btc)\b",
        "The caller is requesting cryptocurrency, which is often used in scams due to irreversibility",
    ),
    (
        "large_amount",
        12,
        r"(\$\s?\d{2,}|\b\d{3,}\s?(dollars|usd)\b)",
        "The caller is discussing suspiciously large amounts of money",
    ),
    // Emotional manipulation
    (
        "family_emergency",
        22,
        r"\b(grandson|granddaughter|son|daughter|mom|dad|mother|father)\b.*\b(in jail|in trouble|accident|hurt|sick)\b",
        "The caller is claiming a family member is in trouble, a common manipulation tactic",
    ),
    (
        "emotional_appeal",
        18,
        r"\b(your (child|grandchild) needs help|call me back or they'll)",
        "The caller is using emotional manipulation to bypass your rational thinking",
    ),
    // Authority
    (
        "authority_threat",
        20,
        r"\b(irs|social security|ssa|police|warrant|court|federal|taxes)\b.*\b(fine|penalty|arrest|deport)",
        "The caller is impersonating authorities and making threats",
    ),
    (
        "authority_claim",
        14,
        r"\bwe represent the (government|internal revenue service|police)\b",
        "The caller is falsely claiming to represent government agencies",
    ),
    // Credentials
    (
        "credential_request",
        18,
        r"\bverify\b.*\b(pin|password|account number|security code|otp|one[- ]time code)\b",
        "The caller is requesting sensitive verification information",
    ),
    (
        "sensitive_request",
        22,
        r"\bread me your (pin|password|code|ssn|social security number)\b",
        "The caller is asking for highly sensitive personal information",
    ),
    // Isolation
    (
        "secrecy",
        14,
        r"\b(don't tell|keep this (secret|between us)|do not mention to anyone)\b",
        "The caller is asking for secrecy, a red flag in legitimate transactions",
    ),
    (
        "new_payee",
        12,
        r"\b(new (account|payee|recipient)|we need new payment info)",
        "The caller is requesting changes to payment information",
    ),
    (
        "remote_support",
        18,
        r"\b(remote access|download this app|teamviewer|anydesk|give me remote|install .* (remote|support))\b",
        "The caller is requesting remote access to your device",
    ),
    (
        "tech_fear",
        14,
        r"\b(computer is infected|your device has a virus|we blocked your account)\b",
        "The caller is using technical threats to create fear",
    ),
    (
        "fast_payment_channel",
        16,
        r"\b(venmo|cash(app)?|zelle|paypal\.me|western union|moneygram)\b",
        "The caller is requesting payment through channels with minimal protection",
    ),
    (
        "social_pressure",
        12,
        r"\b(this is confidential|you must do this now|if you don't comply)\b",
        "The caller is using social pressure to manipulate you",
    ),
    (
        "isolating_instruction",
        10,
        r"\b(only for you|do not discuss|for security reasons do not)\b",
        "The caller is trying to isolate you from others who might detect the scam",
    ),
    (
        "callback_request",
        10,
        r"\b(call us back at|call this number|verify by calling)\b",
        "The caller wants you to call back, possibly to a premium number or to build trust",
    ),
    (
        "malicious_link",
        12,
        r"\b(click the link|open this link|follow this link|scan this qr)",
        "The caller is trying to get you to click on potentially dangerous links",
    ),
    (
        "confirm_code",
        10,
        r"\b(confirmation code|access code|verification link)",
        "The caller is asking for verification codes that could compromise your accounts",
    ),
    (
        "collection_threat",
        14,
        r"\b(final notice|final warning|past due|overdue payment|collection agency)\b",
        "The caller is making collection or legal threats to pressure you",
    ),
    // URLs
    (
        "shortened_url",
        15,
        r"https?://\S*(bit\.ly|tinyurl|goo\.gl|t\.co|short\.link)",
        "The caller shared shortened URLs that hide their true destination",
    ),
    (
        "suspicious_domain",
        18,
        r"https?://\S*(\.tk|\.ml|\.ga|\.cf|\.click|\.download)",
        "The caller referenced suspicious website domains",
    ),
    (
        "long_random_url",
        12,
        r"https?://\S*[a-z0-9-]{20,}\.[a-z]{2,}",
        "The caller mentioned unusually long or random URLs, typical of phishing",
    ),
    (
        "ip_address_url",
        16,
        r"https?://\S*\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}",
        "The caller referenced raw IP addresses instead of proper domain names",
    ),
    // Email
    (
        "email_spoofing",
        20,
        r"(from:.*@.*\..*@.*\..*|reply-to.*@.*\..*@.*\.)",
        "The conversation involves suspicious email addresses or spoofing",
    ),
    (
        "reply_to_spoofing",
        18,
        r"sender.*@.*\..*but.*reply.*@.*\..*",
        "The caller mentioned suspicious email reply addresses",
    ),
    (
        "display_name_spoofing",
        15,
        r"display.*name.*@.*different.*domain",
        "The caller referenced email display name manipulation",
    ),
    // Attachments
    (
        "malicious_attachment",
        20,
        r"attachment.*\.(exe|scr|bat|cmd|com|pif|vbs|js|jar|zip|rar|7z)\b",
        "The conversation mentions suspicious file attachments",
    ),
    (
        "disguised_executable",
        22,
        r"download.*(invoice|receipt|document|statement).*\.(exe|scr|bat)\b",
        "The caller referenced disguised executable files",
    ),
    (
        "password_protected_attachment",
        16,
        r"(password.*protected.*zip|encrypted.*attachment)",
        "The caller mentioned password-protected attachments, often used to bypass security",
    ),
    // Credential harvesting
    (
        "fake_login_page",
        18,
        r"(login.*page.*expired|session.*expired.*login|verify.*account.*login)",
        "The caller referenced expired logins or session timeouts to harvest credentials",
    ),
    (
        "credential_harvesting",
        16,
        r"(update.*billing.*information|verify.*payment.*method|confirm.*account.*details)",
        "The caller is attempting to gather your account or payment information",
    ),
    (
        "account_suspension_scam",
        14,
        r"(suspended.*account.*reactivate|locked.*account.*unlock)",
        "The caller claims your account is suspended or locked",
    ),
    // Brand impersonation
    (
        "tech_support_impersonation",
        12,
        r"\b(microsoft|apple|google|amazon)\b.*\bsupport\b",
        "The caller is impersonating technical support from a known company",
    ),
    (
        "financial_impersonation",
        14,
        r"(paypal.*security.*team|bank.*security.*department|\birs\b.*collection.*unit)",
        "The caller is impersonating financial institutions",
    ),
    (
        "shipping_impersonation",
        12,
        r"(fedex.*delivery.*team|\bups\b.*shipping.*department|usps.*postal.*service)",
        "The caller is impersonating shipping or delivery companies",
    ),
    (
        "social_media_impersonation",
        12,
        r"(facebook.*security.*team|instagram.*support.*team|twitter.*verification)",
        "The caller is impersonating social media platform support",
    ),
    // Romance, inheritance, investment
    (
        "romance_scam_profile",
        16,
        r"(military.*deployed.*overseas|oil.*rig.*worker.*stranded)",
        "The conversation contains elements typical of romance scams",
    ),
    (
        "inheritance_lottery_scam",
        18,
        r"(inheritance.*from.*deceased|lottery.*winner.*claim.*prize)",
        "The caller is using classic inheritance or lottery scam tactics",
    ),
    (
        "investment_scam",
        16,
        r"(guaranteed.*return.*investment|risk.*free.*trading.*opportunity)",
        "The caller is promoting suspicious investment opportunities",
    ),
    (
        "crypto_investment_scam",
        18,
        r"(double.*your.*bitcoin|crypto.*mining.*investment.*guaranteed)",
        "The caller is promoting suspicious cryptocurrency investments",
    ),
    (
        "securities_fraud",
        20,
        r"(pump.*and.*dump.*scheme|insider.*trading.*tip)",
        "The caller is engaging in potential securities fraud or market manipulation",
    ),
    // Jobs
    (
        "work_from_home_scam",
        14,
        r"(work.*from.*home.*no.*experience.*needed|make.*money.*online.*guaranteed)",
        "The caller is promoting suspicious work-from-home opportunities",
    ),
    (
        "job_scam",
        16,
        r"(mystery.*shopper.*job|package.*forwarding.*job|check.*cashing.*job)",
        "The caller is offering suspicious job opportunities",
    ),
    (
        "identity_theft_job",
        18,
        r"(send.*us.*your.*resume.*and.*ssn|background.*check.*requires.*ssn)",
        "The caller is requesting sensitive personal information for alleged job purposes",
    ),
    // Charity
    (
        "charity_scam",
        14,
        r"(urgent.*donation.*needed|disaster.*relief.*fund|help.*victims.*send.*money)",
        "The caller is soliciting donations in a suspicious manner",
    ),
    (
        "crowdfunding_scam",
        12,
        r"(go.*fund.*me.*fake.*campaign|crowdfunding.*scam)",
        "The caller referenced suspicious crowdfunding campaigns",
    ),
    // Lottery
    (
        "lottery_scam",
        16,
        r"(congratulations.*you.*won.*lottery|sweepstakes.*winner.*claim.*prize)",
        "The caller claims you've won a lottery or sweepstakes you didn't enter",
    ),
    (
        "nigerian_prince_scam",
        20,
        r"(nigerian.*prince.*inheritance|foreign.*government.*official.*needs.*help)",
        "The conversation has elements of the classic 'Nigerian prince' or foreign official scam",
    ),
    // Tech support
    (
        "tech_support_scam",
        14,
        r"(windows.*security.*alert|microsoft.*detected.*virus|your.*computer.*is.*infected)",
        "The caller is running a technical support scam",
    ),
    (
        "subscription_scam",
        12,
        r"(subscription.*renewal.*required|payment.*method.*expired.*update)",
        "The caller claims your subscription needs renewal or payment",
    ),
    (
        "software_license_scam",
        10,
        r"(software.*license.*expired|product.*key.*invalid.*purchase)",
        "The caller claims your software license is expired or invalid",
    ),
    // Banking
    (
        "banking_scam",
        16,
        r"(suspicious.*activity.*detected.*account|unauthorized.*login.*attempt)",
        "The caller is attempting a banking-related scam",
    ),
    (
        "card_fraud_scam",
        14,
        r"(card.*compromised.*replace.*immediately|fraud.*detected.*verify.*identity)",
        "The caller claims your card has been compromised",
    ),
    (
        "bank_transfer_scam",
        18,
        r"(wire.*transfer.*to.*secure.*account|move.*money.*to.*safe.*account)",
        "The caller is requesting suspicious bank transfers",
    ),
    // Government
    (
        "government_scam",
        16,
        r"(\birs\b.*tax.*refund.*claim|social.*security.*benefits.*suspended)",
        "The caller is impersonating government agencies",
    ),
    (
        "legal_threat_scam",
        18,
        r"(arrest.*warrant.*issued.*unless.*payment|court.*summons.*immediate.*response)",
        "The caller is making legal threats to pressure you",
    ),
    (
        "healthcare_scam",
        14,
        r"(medicare.*card.*replacement.*required|medicaid.*benefits.*suspended)",
        "The caller is impersonating healthcare or insurance entities",
    ),
    // Generic
    (
        "help_request",
        8,
        r"\b(help me|need your help|please help)\b",
        "The caller is making suspicious help requests",
    ),
    (
        "self_reference",
        6,
        r"\b(scam|fraud|suspicious)",
        "The conversation references scams, which can be a way to build false trust",
    ),
];

impl RuleTable {
    /// Build the built-in table.
    pub fn builtin() -> Result<Self> {
        Self::builder()
            .specs(
                BUILTIN_RULES
                    .iter()
                    .map(|&(tag, weight, pattern, explanation)| {
                        RuleSpec::new(tag, weight, pattern).with_explanation(explanation)
                    }),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_all;

    fn matched_tags(text: &str) -> Vec<String> {
        let table = RuleTable::builtin().unwrap();
        let mut tags: Vec<String> = match_all(text, &table).into_iter().map(|m| m.tag).collect();
        tags.sort();
        tags
    }

    #[test]
    fn builtin_table_builds() {
        let table = RuleTable::builtin().unwrap();
        assert_eq!(table.len(), 63);
        assert_eq!(table.len(), BUILTIN_RULES.len());
    }

    #[test]
    fn builtin_max_score_is_weight_sum() {
        let table = RuleTable::builtin().unwrap();
        let expected: i64 = BUILTIN_RULES.iter().map(|r| r.1).sum();
        assert_eq!(table.max_score(), u64::try_from(expected).unwrap());
    }

    #[test]
    fn every_builtin_rule_has_explanation() {
        let table = RuleTable::builtin().unwrap();
        assert!(table.rules().iter().all(|r| r.explanation().is_some()));
    }

    #[test]
    fn authority_threat_call() {
        assert_eq!(
            matched_tags("This is the IRS, and there is a warrant for your arrest unless you pay now."),
            vec!["authority_threat", "urgency"]
        );
    }

    #[test]
    fn gift_card_payment() {
        assert_eq!(
            matched_tags("The only way to pay the fee is with a gift card."),
            vec!["gift_card"]
        );
    }

    #[test]
    fn wire_transfer_to_secure_account() {
        assert_eq!(
            matched_tags("We need you to send a wire transfer to a secure account."),
            vec!["bank_transfer_scam", "money_transfer"]
        );
    }

    #[test]
    fn benign_small_talk_matches_nothing() {
        assert!(matched_tags("Hello, how are you today?").is_empty());
        assert!(matched_tags("What a lovely day for a walk in the park.").is_empty());
    }

    #[test]
    fn word_boundaries_hold() {
        // "know" must not trip the "now" alternative
        assert!(matched_tags("I know").is_empty());
    }

    #[test]
    fn shortened_url_detected() {
        assert!(matched_tags("go to https://bit.ly/abc123 please").contains(&"shortened_url".to_owned()));
    }
}
