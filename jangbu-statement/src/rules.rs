//! Classification rule tables.
//!
//! The classifier walks these in a fixed order — exclusions, then overrides,
//! then the direction's keyword table — and the first match wins. Override
//! rules are structured records keyed on exact (date, substring, amount)
//! combinations: they exist because the same counterparty can be a capital
//! contributor in one transaction and a lender in the next, which no keyword
//! can disambiguate.

use chrono::NaiveDate;
use jangbu_core::Category;

/// Marks payment-processor test rows as excluded regardless of direction.
/// All needles must appear in the description and the magnitude must match.
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    pub needles: Vec<String>,
    pub abs_amount: i64,
}

impl ExclusionRule {
    pub fn matches(&self, desc_lower: &str, abs_amount: i64) -> bool {
        abs_amount == self.abs_amount
            && self.needles.iter().all(|n| desc_lower.contains(n.as_str()))
    }
}

/// Reclassifies one known exceptional transaction against the generic rule
/// that would otherwise apply. `amount` is signed and exact; `date` of
/// `None` matches any day.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub date: Option<NaiveDate>,
    pub needle: String,
    pub amount: i64,
    pub category: Category,
}

impl OverrideRule {
    pub fn matches(
        &self,
        date: NaiveDate,
        desc_lower: &str,
        normalized: &str,
        amount: i64,
    ) -> bool {
        if amount != self.amount {
            return false;
        }
        if let Some(d) = self.date {
            if d != date {
                return false;
            }
        }
        desc_lower.contains(self.needle.as_str()) || normalized.contains(self.needle.as_str())
    }
}

/// Generic keyword rule over the lowercased description (and, when
/// `on_kind` is set, the bank's transaction-kind column too).
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub needles: Vec<String>,
    /// All needles must hit instead of any one of them.
    pub require_all: bool,
    /// Also match needles against the transaction kind.
    pub on_kind: bool,
    pub category: Category,
}

impl KeywordRule {
    pub fn matches(&self, desc_lower: &str, kind_lower: &str) -> bool {
        let hit = |n: &String| {
            desc_lower.contains(n.as_str()) || (self.on_kind && kind_lower.contains(n.as_str()))
        };
        if self.require_all {
            self.needles.iter().all(hit)
        } else {
            self.needles.iter().any(hit)
        }
    }
}

fn kw(needles: &[&str], category: Category) -> KeywordRule {
    KeywordRule {
        needles: needles.iter().map(|s| s.to_lowercase()).collect(),
        require_all: false,
        on_kind: false,
        category,
    }
}

fn kw_all(needles: &[&str], category: Category) -> KeywordRule {
    KeywordRule {
        require_all: true,
        ..kw(needles, category)
    }
}

fn kw_kind(needles: &[&str], category: Category) -> KeywordRule {
    KeywordRule {
        on_kind: true,
        ..kw(needles, category)
    }
}

/// The full ordered rule configuration for one classifier.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub exclusions: Vec<ExclusionRule>,
    pub overrides: Vec<OverrideRule>,
    pub inbound: Vec<KeywordRule>,
    pub outbound: Vec<KeywordRule>,
}

impl RuleSet {
    /// Rule tables derived from the source ledger.
    pub fn builtin() -> Self {
        Self {
            exclusions: vec![
                // AWS card-registration test charges (±100원).
                ExclusionRule {
                    needles: vec!["amazon".into(), "aws".into()],
                    abs_amount: 100,
                },
            ],
            overrides: vec![
                // A transfer under the company name that was actually a
                // capital contribution by 정동민.
                OverrideRule {
                    date: NaiveDate::from_ymd_opt(2025, 6, 18),
                    needle: "노피".into(),
                    amount: 500_000,
                    category: Category::capital("정동민"),
                },
                // Loan proceeds disguised as a capital contribution.
                OverrideRule {
                    date: NaiveDate::from_ymd_opt(2025, 6, 16),
                    needle: "김선호".into(),
                    amount: 9_950_000,
                    category: Category::borrowing("김선호"),
                },
                OverrideRule {
                    date: None,
                    needle: "김선호".into(),
                    amount: 5_000_000,
                    category: Category::borrowing("김선호"),
                },
                OverrideRule {
                    date: None,
                    needle: "송호빈".into(),
                    amount: 10_000_000,
                    category: Category::borrowing("송호빈"),
                },
                // Loan repayments misrecorded as plain transfers.
                OverrideRule {
                    date: NaiveDate::from_ymd_opt(2025, 7, 2),
                    needle: "김선호".into(),
                    amount: -10_000_000,
                    category: Category::borrowing_repayment("김선호"),
                },
                OverrideRule {
                    date: None,
                    needle: "김선호".into(),
                    amount: -10_000_000,
                    category: Category::borrowing_repayment("김선호"),
                },
                OverrideRule {
                    date: None,
                    needle: "송호빈".into(),
                    amount: -10_000_000,
                    category: Category::borrowing_repayment("송호빈"),
                },
                // Ad-spend refunds at known amounts.
                OverrideRule {
                    date: None,
                    needle: "카카오".into(),
                    amount: 144_762,
                    category: Category::non_operating_income("ad refund"),
                },
                OverrideRule {
                    date: None,
                    needle: "카카오".into(),
                    amount: 90_000,
                    category: Category::non_operating_income("ad refund"),
                },
                OverrideRule {
                    date: None,
                    needle: "facebk".into(),
                    amount: 2_874,
                    category: Category::non_operating_income("ad refund"),
                },
                OverrideRule {
                    date: None,
                    needle: "facebook".into(),
                    amount: 2_874,
                    category: Category::non_operating_income("ad refund"),
                },
                // Naver Pay equipment purchase routed as a bare transfer.
                OverrideRule {
                    date: None,
                    needle: "네이버페이".into(),
                    amount: -27_800,
                    category: Category::expense("business ops - equipment"),
                },
            ],
            inbound: vec![
                kw(&["유모바일"], Category::revenue("유모바일")),
                kw(&["티아이앤이"], Category::revenue("티아이앤이")),
                kw(&["해피넷"], Category::revenue("해피넷")),
                kw(&["폰샵"], Category::revenue("폰샵")),
                kw(&["그로우플러"], Category::revenue("그로우플러")),
                kw(&["폰슐랭"], Category::revenue("폰슐랭")),
                kw(&["이노스페이스"], Category::revenue("이노스페이스")),
                kw_kind(&["이자"], Category::non_operating_income("interest")),
                kw_kind(&["캐시백"], Category::non_operating_income("cashback")),
                // Office-rent refund from the previous landlord.
                kw(&["박환성"], Category::non_operating_income("rent refund")),
                kw(&["보증금"], Category::deposit_return("office")),
            ],
            outbound: vec![
                // Advertising channels.
                kw_all(&["카카오", "광고"], Category::expense("advertising - kakao")),
                kw(
                    &["facebook", "fb.me/ads", "facebk", "meta"],
                    Category::expense("advertising - facebook"),
                ),
                kw(&["구글", "google"], Category::expense("advertising - google")),
                kw(&["뽐뿌", "바이럴"], Category::expense("advertising - viral")),
                kw(
                    &["카톡채널", "카카오채널"],
                    Category::expense("advertising - kakao channel"),
                ),
                // Staff welfare.
                kw(
                    &[
                        "향원각", "식사", "식당", "롯데몰", "롯데쇼핑", "롯데슈", "갓텐",
                        "세븐일레븐", "양평해장국", "맥도날드", "브루다", "gs25", "두꺼비집",
                        "빙츄르",
                    ],
                    Category::expense("welfare - meals"),
                ),
                kw(
                    &["메가엠지씨", "카페", "커피"],
                    Category::expense("welfare - coffee"),
                ),
                kw(
                    &["데이앤나잇", "편의점"],
                    Category::expense("welfare - convenience store"),
                ),
                // 대교통신 sells scanners, not telecom service; must come
                // before the telecom keywords.
                kw(&["대교통신"], Category::expense("business ops - equipment")),
                kw(
                    &["통신", "헬로비전", "인터넷", "케이블"],
                    Category::expense("telecom"),
                ),
                kw(
                    &["디자이너", "사례비", "외주", "프리랜서"],
                    Category::expense("outsourcing"),
                ),
                // Hosting and software subscriptions.
                kw(&["amazon", "aws"], Category::expense("service ops - aws")),
                kw(&["anthropic"], Category::expense("service ops - anthropic")),
                kw(&["webflow"], Category::expense("service ops - webflow")),
                kw_all(&["ssl", "결제"], Category::expense("service ops - ssl")),
                // Office: the deposit is an asset, rent is an expense.
                kw_all(&["사무실", "보증금"], Category::deposit("office")),
                kw_all(&["월세", "보증금"], Category::deposit("office")),
                kw(&["사무실", "월세"], Category::expense("business ops - office")),
                kw(
                    &["보증보험료", "보험"],
                    Category::expense("business ops - insurance"),
                ),
                kw(
                    &["신분증", "스캐너", "공기청정기", "장비", "다이소", "daiso"],
                    Category::expense("business ops - equipment"),
                ),
                kw(
                    &["인증서", "범용인증"],
                    Category::expense("business ops - certificate"),
                ),
                kw_all(
                    &["보증금", "이자"],
                    Category::expense("business ops - deposit interest"),
                ),
                kw_kind(
                    &["공과금", "지로", "지방세", "세금", "서울등록"],
                    Category::expense("taxes and dues"),
                ),
                kw(
                    &["주유", "택시", "버스", "지하철", "주차", "시설관리공단"],
                    Category::expense("travel"),
                ),
                kw(&["문구", "사무용품"], Category::expense("supplies")),
                kw(
                    &["카카오선물", "선물하기"],
                    Category::expense("entertainment"),
                ),
                // Small equipment bought from private sellers.
                kw(
                    &["조순남", "이미숙", "박옥자", "연동현"],
                    Category::expense("business ops - equipment"),
                ),
                // Refunds of principal spending adjust capital, they are
                // not income.
                kw(&["환불"], Category::capital_withdrawal("refund")),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jangbu_core::AccountType;

    #[test]
    fn test_exclusion_needs_all_needles_and_amount() {
        let rule = ExclusionRule {
            needles: vec!["amazon".into(), "aws".into()],
            abs_amount: 100,
        };
        assert!(rule.matches("amazon web services aws", 100));
        assert!(!rule.matches("amazon web services aws", 120_000));
        assert!(!rule.matches("amazon prime", 100));
    }

    #[test]
    fn test_override_date_and_amount_are_exact() {
        let rule = OverrideRule {
            date: NaiveDate::from_ymd_opt(2025, 6, 16),
            needle: "김선호".into(),
            amount: 9_950_000,
            category: Category::borrowing("김선호"),
        };
        let d = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        assert!(rule.matches(d, "김선호", "김선호", 9_950_000));
        assert!(!rule.matches(d, "김선호", "김선호", 9_950_001));
        let other = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();
        assert!(!rule.matches(other, "김선호", "김선호", 9_950_000));
    }

    #[test]
    fn test_override_matches_normalized_alias() {
        let rule = OverrideRule {
            date: None,
            needle: "김선호".into(),
            amount: 5_000_000,
            category: Category::borrowing("김선호"),
        };
        let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        // Raw description says 이지애; the alias table folds it to 김선호.
        assert!(rule.matches(d, "이지애", "김선호", 5_000_000));
    }

    #[test]
    fn test_keyword_all_vs_any() {
        let any = kw(&["구글", "google"], Category::expense("advertising - google"));
        assert!(any.matches("google ads", ""));
        assert!(any.matches("구글코리아", ""));

        let all = kw_all(&["카카오", "광고"], Category::expense("advertising - kakao"));
        assert!(all.matches("카카오 광고센터", ""));
        assert!(!all.matches("카카오뱅크", ""));
    }

    #[test]
    fn test_keyword_on_kind() {
        let rule = kw_kind(&["이자"], Category::non_operating_income("interest"));
        assert!(rule.matches("결산이자", ""));
        assert!(rule.matches("", "예금이자"));
        let plain = kw(&["이자"], Category::non_operating_income("interest"));
        assert!(!plain.matches("", "예금이자"));
    }

    #[test]
    fn test_builtin_tables_are_well_formed() {
        let rules = RuleSet::builtin();
        assert!(!rules.exclusions.is_empty());
        assert!(!rules.overrides.is_empty());
        for rule in rules.inbound.iter().chain(&rules.outbound) {
            assert!(!rule.needles.is_empty());
            // Keyword needles are stored lowercased.
            for n in &rule.needles {
                assert_eq!(n, &n.to_lowercase());
            }
        }
        // Override tables never emit the excluded sentinel.
        assert!(rules
            .overrides
            .iter()
            .all(|o| o.category.account_type != AccountType::Excluded));
    }
}
