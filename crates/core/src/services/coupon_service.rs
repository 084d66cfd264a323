use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::coupon_dto::CouponQuote;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub code: String,
    pub discount: i64,
    pub applicable_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponOutcome {
    Applied(CouponQuote),
    NotFound,
    PriceMismatch,
}

/// Looks codes up in the configured `code:discount;price,...` table.
///
/// The table is parsed on every call. A single bad entry fails the whole lookup.
#[derive(Clone)]
pub struct CouponService {
    table: String,
}

impl CouponService {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn parse_table(raw: &str) -> Result<Vec<Coupon>, ApiError> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Self::parse_entry)
            .collect()
    }

    fn parse_entry(entry: &str) -> Result<Coupon, ApiError> {
        let malformed = || {
            error!(entry, "malformed coupon table entry");
            ApiError::Internal("Coupon configuration is invalid".into())
        };

        let (code, rest) = entry.split_once(':').ok_or_else(malformed)?;
        let (discount, price) = rest.split_once(';').ok_or_else(malformed)?;

        let code = code.trim();
        if code.is_empty() {
            return Err(malformed());
        }

        Ok(Coupon {
            code: code.to_string(),
            discount: discount.trim().parse().map_err(|_| malformed())?,
            applicable_price: price.trim().parse().map_err(|_| malformed())?,
        })
    }

    pub fn lookup(&self, code: &str) -> Result<Option<Coupon>, ApiError> {
        let code = code.trim();
        Ok(Self::parse_table(&self.table)?
            .into_iter()
            .find(|c| c.code == code))
    }

    pub fn evaluate(&self, code: &str, original_price: i64) -> Result<CouponOutcome, ApiError> {
        let Some(coupon) = self.lookup(code)? else {
            return Ok(CouponOutcome::NotFound);
        };

        if coupon.applicable_price != original_price {
            return Ok(CouponOutcome::PriceMismatch);
        }

        Ok(CouponOutcome::Applied(CouponQuote {
            discount: coupon.discount,
            new_price: original_price - coupon.discount,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save10_applies_only_at_its_price() {
        let coupons = CouponService::new("SAVE10:10;500");

        assert_eq!(
            coupons.evaluate("SAVE10", 500).unwrap(),
            CouponOutcome::Applied(CouponQuote {
                discount: 10,
                new_price: 490
            })
        );
        assert_eq!(
            coupons.evaluate("SAVE10", 400).unwrap(),
            CouponOutcome::PriceMismatch
        );
        assert_eq!(
            coupons.evaluate("NOPE", 500).unwrap(),
            CouponOutcome::NotFound
        );
    }

    #[test]
    fn entries_tolerate_whitespace() {
        let coupons = CouponService::new(" EARLY : 100 ; 1000 , SAVE10:10;500 ");
        assert_eq!(
            coupons.lookup("EARLY").unwrap(),
            Some(Coupon {
                code: "EARLY".into(),
                discount: 100,
                applicable_price: 1000
            })
        );
    }

    #[test]
    fn one_malformed_entry_fails_everything() {
        let coupons = CouponService::new("SAVE10:10;500,BROKEN:ten;500");
        assert!(matches!(
            coupons.evaluate("SAVE10", 500),
            Err(ApiError::Internal(_))
        ));

        for raw in ["NOPRICE:10", "nocolon", ":10;500", "X:10;"] {
            assert!(CouponService::parse_table(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn empty_table_finds_nothing() {
        let coupons = CouponService::new("");
        assert_eq!(coupons.evaluate("SAVE10", 500).unwrap(), CouponOutcome::NotFound);
    }
}
