//! Turns the raw values read from one product block into a [`Product`].

use crate::layout::FieldName;
use crate::selector::BlockHandle;
use crate::types::Product;
use tracing::debug;

/// Prefix the results page wraps outbound links with. Links carrying it
/// do not redirect correctly.
pub const REDIRECT_PREFIX: &str = "/url?q=";

/// Both renderings of an info slot; which one is used depends on what the
/// slot turns out to hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoSlot {
    pub markup: String,
    pub text: String,
}

/// Field values as found in a block, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlock {
    pub title: Option<String>,
    pub image_link: Option<String>,
    pub link: Option<String>,
    pub slots: [Option<InfoSlot>; 3],
}

impl RawBlock {
    /// Read every field of `handle` through the layout table.
    pub fn capture(handle: &BlockHandle<'_>) -> Self {
        let slot = |field: FieldName| {
            handle.element(field).map(|_| InfoSlot {
                markup: handle.markup(field).unwrap_or_default(),
                text: handle.text(field).unwrap_or_default(),
            })
        };

        Self {
            title: handle.markup(FieldName::Title),
            image_link: handle.attr(FieldName::ImageLink, "src"),
            link: handle.attr(FieldName::Link, "href"),
            slots: [
                slot(FieldName::FirstInfo),
                slot(FieldName::SecondInfo),
                slot(FieldName::ThirdInfo),
            ],
        }
    }
}

/// Info slot interpretation, decided once per block.
///
/// Blocks without a rating expose two slots, blocks with one expose three;
/// the rating sits between shipping and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockFields {
    RatingAbsent {
        shipping: String,
        price_and_seller: String,
    },
    RatingPresent {
        shipping: String,
        rating: String,
        price_and_seller: String,
    },
}

impl BlockFields {
    pub fn from_slots(slots: &[Option<InfoSlot>; 3]) -> Self {
        let [first, second, third] = slots;
        let shipping = first.as_ref().map(|s| s.text.clone()).unwrap_or_default();

        match third {
            Some(third) if !third.markup.is_empty() => BlockFields::RatingPresent {
                shipping,
                rating: second.as_ref().map(|s| s.text.clone()).unwrap_or_default(),
                price_and_seller: third.markup.clone(),
            },
            _ => BlockFields::RatingAbsent {
                shipping,
                price_and_seller: second.as_ref().map(|s| s.markup.clone()).unwrap_or_default(),
            },
        }
    }

    pub fn has_rating(&self) -> bool {
        matches!(self, BlockFields::RatingPresent { .. })
    }
}

/// Strip one leading [`REDIRECT_PREFIX`] from `link`, leaving anything else
/// untouched.
pub fn repair_link(link: &str) -> &str {
    link.strip_prefix(REDIRECT_PREFIX).unwrap_or(link)
}

/// Build a product out of raw block values. Missing values become "".
pub fn normalize(raw: RawBlock) -> Product {
    let fields = BlockFields::from_slots(&raw.slots);
    let link = raw
        .link
        .as_deref()
        .map(repair_link)
        .unwrap_or_default()
        .to_string();

    let (shipping_price, price_and_seller, rating) = match fields {
        BlockFields::RatingAbsent {
            shipping,
            price_and_seller,
        } => (shipping, price_and_seller, None),
        BlockFields::RatingPresent {
            shipping,
            rating,
            price_and_seller,
        } => (shipping, price_and_seller, Some(rating)),
    };
    debug!(rated = rating.is_some(), "Normalized product block");

    Product {
        title: raw.title.unwrap_or_default(),
        image_link: raw.image_link.unwrap_or_default(),
        price_and_seller,
        shipping_price,
        link,
        rating,
    }
}
