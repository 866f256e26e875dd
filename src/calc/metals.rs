use super::{percent_of, positive};
use crate::core::error::CalcError;
use crate::core::market::{MarketSnapshot, Metal};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const GRAMS_PER_TOLA: f64 = 11.664;

/// Purity presets in percent, by karat.
pub const KARAT_PRESETS: [(u8, f64); 5] = [
    (24, 100.0),
    (22, 91.67),
    (20, 83.33),
    (18, 75.0),
    (14, 58.33),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Tola,
    Gram,
    Ounce,
    Kilogram,
}

impl WeightUnit {
    pub fn grams_per_unit(&self) -> f64 {
        match self {
            WeightUnit::Tola => GRAMS_PER_TOLA,
            WeightUnit::Gram => 1.0,
            WeightUnit::Ounce => 31.1035,
            WeightUnit::Kilogram => 1000.0,
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                WeightUnit::Tola => "tola",
                WeightUnit::Gram => "gram",
                WeightUnit::Ounce => "ounce",
                WeightUnit::Kilogram => "kg",
            }
        )
    }
}

impl FromStr for WeightUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tola" | "tolas" => Ok(WeightUnit::Tola),
            "g" | "gram" | "grams" => Ok(WeightUnit::Gram),
            "oz" | "ounce" | "ounces" => Ok(WeightUnit::Ounce),
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kilogram),
            _ => Err(anyhow!("Invalid weight unit: {}", s)),
        }
    }
}

pub fn to_grams(quantity: f64, unit: WeightUnit) -> f64 {
    quantity * unit.grams_per_unit()
}

pub fn from_grams(grams: f64, unit: WeightUnit) -> f64 {
    grams / unit.grams_per_unit()
}

pub fn price_per_gram(price_per_tola: f64) -> f64 {
    price_per_tola / GRAMS_PER_TOLA
}

/// Purity in percent. Parses `"91.67"` as well as karat labels like `"22k"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Purity(pub f64);

impl Purity {
    pub fn from_karat(karat: u8) -> Option<Self> {
        KARAT_PRESETS
            .iter()
            .find(|(k, _)| *k == karat)
            .map(|(_, percent)| Purity(*percent))
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl Default for Purity {
    fn default() -> Self {
        Purity(100.0)
    }
}

impl FromStr for Purity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(karat) = s.strip_suffix(['k', 'K']) {
            let karat: u8 = karat
                .parse()
                .map_err(|_| anyhow!("Invalid karat value: {}", s))?;
            return Purity::from_karat(karat).ok_or_else(|| anyhow!("Unsupported karat: {}K", karat));
        }
        let percent = s
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| anyhow!("Invalid purity: {}", s))?;
        Ok(Purity(percent))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetalInput {
    pub metal: Metal,
    pub quantity: f64,
    pub unit: WeightUnit,
    /// Price paid per `unit`
    pub purchase_price: f64,
    pub purity: Purity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetalValuation {
    pub metal: Metal,
    pub quantity_grams: f64,
    pub price_per_gram: f64,
    pub total_investment: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub return_percent: Option<f64>,
}

pub fn value_metal(
    input: &MetalInput,
    snapshot: &MarketSnapshot,
) -> Result<MetalValuation, CalcError> {
    positive("quantity", input.quantity)?;
    positive("purchase price", input.purchase_price)?;
    let purity = input.purity.percent();
    if !purity.is_finite() || purity <= 0.0 || purity > 100.0 {
        return Err(CalcError::InvalidPurity(purity));
    }

    let price_per_tola = snapshot.metal_price(input.metal).price_per_tola;
    if !price_per_tola.is_finite() || price_per_tola <= 0.0 {
        let name = match input.metal {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
        };
        return Err(CalcError::MissingPrice(name));
    }

    let quantity_grams = to_grams(input.quantity, input.unit);
    let price_per_gram = price_per_gram(price_per_tola);
    let current_value = quantity_grams * price_per_gram * purity / 100.0;
    let total_investment = input.quantity * input.purchase_price;
    let profit_loss = current_value - total_investment;

    Ok(MetalValuation {
        metal: input.metal,
        quantity_grams,
        price_per_gram,
        total_investment,
        current_value,
        profit_loss,
        return_percent: percent_of(profit_loss, total_investment),
    })
}
