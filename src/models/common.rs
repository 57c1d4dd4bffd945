use std::fmt;

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct UserId(pub i32);

#[derive(Clone, Debug, Default, Display, Eq, From, Hash, Into, PartialEq, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, Default, Display, Eq, From, Hash, Into, PartialEq, Serialize, Deserialize)]
pub struct VariantId(pub String);

#[derive(Clone, Debug, Default, Display, Eq, From, Hash, Into, PartialEq, Serialize, Deserialize)]
pub struct CartId(pub String);

#[derive(Clone, Debug, Default, Display, Eq, From, Hash, Into, PartialEq, Serialize, Deserialize)]
pub struct CartItemId(pub String);

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Quantity(pub i32);

#[derive(Clone, Copy, Debug, Default, Display, From, FromStr, Into, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice(pub f64);

/// Who the cart operations act for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Customer {
    Anonymous,
    User(UserId),
}

impl Customer {
    pub fn is_authenticated(&self) -> bool {
        match *self {
            Customer::User(_) => true,
            Customer::Anonymous => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Idr,
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match *self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShippingType {
    Domestic,
    International,
}

/// Remote value as a UI component sees it.
///
/// `Loading` drives the primary loading indicator; `Refreshing` keeps the
/// current value on screen while a background re-fetch is outstanding.
#[derive(Clone, Debug, PartialEq)]
pub enum Loadable<T> {
    Idle,
    Loading,
    Refreshing(T),
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn begin_load(self) -> Self {
        Loadable::Loading
    }

    pub fn begin_refresh(self) -> Self {
        match self {
            Loadable::Loaded(value) | Loadable::Refreshing(value) => Loadable::Refreshing(value),
            _ => Loadable::Loading,
        }
    }

    pub fn resolve(self, value: T) -> Self {
        Loadable::Loaded(value)
    }

    pub fn fail(self, message: String) -> Self {
        Loadable::Failed(message)
    }

    pub fn is_loading(&self) -> bool {
        match *self {
            Loadable::Loading => true,
            _ => false,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        match *self {
            Loadable::Refreshing(_) => true,
            _ => false,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match *self {
            Loadable::Loaded(ref value) | Loadable::Refreshing(ref value) => Some(value),
            _ => None,
        }
    }
}
