//! Card model: either full card data or a token reference to a previously
//! tokenized card.

use cards::{CardError, CardExpiration, CardHolderName, CardNumber, CardSecurityCode};
use masking::PeekInterface;
use serde::{Deserialize, Serialize};

use crate::errors::CustomResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    #[default]
    Credit,
    Debit,
}

impl AccountType {
    /// The zero-padded wire form of `DS_MERCHANT_ACCOUNTTYPE`.
    pub(crate) const fn two_digits(self) -> &'static str {
        match self {
            Self::Credit => "01",
            Self::Debit => "02",
        }
    }
}

/// The two incompatible 3-D Secure wire-format generations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreeDSecureVersion {
    V1,
    #[default]
    V2,
}

/// A payment card.
///
/// Constructed either with full card data ([`Card::credit`], [`Card::debit`])
/// or as a token reference ([`Card::token`]) carrying only the identifier
/// returned by an earlier tokenizing authorization. Debit cards always go
/// through 3-D Secure.
#[derive(Clone, Debug, Default)]
pub struct Card {
    account_type: AccountType,
    number: Option<CardNumber>,
    expiration: Option<CardExpiration>,
    holder_name: Option<CardHolderName>,
    security_code: Option<CardSecurityCode>,
    three_d_secure: bool,
    three_d_secure_version: ThreeDSecureVersion,
    card_brand: Option<u32>,
    card_country: Option<u32>,
    identifier: Option<String>,
}

impl Card {
    pub fn credit(
        pan: &str,
        expiration_year: &str,
        expiration_month: &str,
        holder_name: &str,
        security_code: &str,
    ) -> CustomResult<Self, CardError> {
        Ok(Self {
            account_type: AccountType::Credit,
            number: Some(CardNumber::new(pan)?),
            expiration: Some(CardExpiration::new(expiration_year, expiration_month)?),
            holder_name: Some(CardHolderName::new(holder_name)?),
            security_code: Some(CardSecurityCode::new(security_code)?),
            ..Self::default()
        })
    }

    pub fn debit(
        pan: &str,
        expiration_year: &str,
        expiration_month: &str,
        holder_name: &str,
        security_code: &str,
    ) -> CustomResult<Self, CardError> {
        let mut card = Self::credit(
            pan,
            expiration_year,
            expiration_month,
            holder_name,
            security_code,
        )?;
        card.set_account_type(AccountType::Debit);
        Ok(card)
    }

    /// A reference to a previously tokenized card; no card data is carried.
    pub fn token(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Switching to debit also turns 3-D Secure on.
    pub fn set_account_type(&mut self, account_type: AccountType) {
        self.account_type = account_type;

        if account_type == AccountType::Debit {
            self.three_d_secure = true;
        }
    }

    pub fn is_three_d_secure(&self) -> bool {
        self.three_d_secure
    }

    pub fn set_three_d_secure(&mut self, three_d_secure: bool) {
        self.three_d_secure = three_d_secure;
    }

    pub fn three_d_secure_version(&self) -> ThreeDSecureVersion {
        self.three_d_secure_version
    }

    pub fn set_three_d_secure_version(&mut self, version: ThreeDSecureVersion) {
        self.three_d_secure_version = version;
    }

    pub fn number(&self) -> Option<&CardNumber> {
        self.number.as_ref()
    }

    pub fn expiration(&self) -> Option<&CardExpiration> {
        self.expiration.as_ref()
    }

    pub fn holder_name(&self) -> Option<&CardHolderName> {
        self.holder_name.as_ref()
    }

    pub fn security_code(&self) -> Option<&CardSecurityCode> {
        self.security_code.as_ref()
    }

    pub fn card_brand(&self) -> Option<u32> {
        self.card_brand
    }

    pub fn set_card_brand(&mut self, card_brand: u32) {
        self.card_brand = Some(card_brand);
    }

    pub fn card_country(&self) -> Option<u32> {
        self.card_country
    }

    pub fn set_card_country(&mut self, card_country: u32) {
        self.card_country = Some(card_country);
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = Some(identifier.into());
    }

    /// Whether this card goes through the v2 3-D Secure flow, which signs
    /// the whole request body instead of a field subset.
    pub(crate) fn uses_emv_v2(&self) -> bool {
        self.three_d_secure && self.three_d_secure_version == ThreeDSecureVersion::V2
    }

    pub(crate) fn pan_string(&self) -> Option<String> {
        self.number.as_ref().map(CardNumber::get_card_no)
    }

    pub(crate) fn security_code_string(&self) -> Option<String> {
        self.security_code.as_ref().map(|csc| csc.peek().clone())
    }

    pub(crate) fn expiration_yymm(&self) -> Option<String> {
        self.expiration.as_ref().map(CardExpiration::yymm)
    }
}
