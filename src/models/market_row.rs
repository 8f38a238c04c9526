// ============================================================================
// Structure : MarketRow
// ============================================================================
// Une ligne normalisée de données de marché, prête pour le tableau
//
// CONCEPTS RUST :
// 1. Immutabilité : une ligne n'est jamais modifiée après sa création
// 2. Option<f64> : CoinGecko renvoie parfois null pour le prix ou l'offre
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Currency;

/// Ligne du tableau des marchés
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    /// Identifiant CoinGecko (ex: "bitcoin"), sert aussi de clé de ligne
    pub id: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// URL du logo
    pub image_url: String,

    /// Prix dans la devise demandée
    pub current_price: Option<f64>,

    pub circulating_supply: Option<f64>,

    /// Dernière mise à jour côté API
    pub last_updated: Option<DateTime<Utc>>,
}

impl MarketRow {
    /// Clé stable de la ligne (identique à l'id)
    pub fn key(&self) -> &str {
        &self.id
    }

    /// Formatte le prix : "$67,012.50" ou "N/A"
    ///
    /// Les petits prix gardent plus de décimales (ex: "$0.000012")
    pub fn display_price(&self, currency: Currency) -> String {
        match self.current_price {
            Some(price) if price.abs() >= 1.0 => {
                format!("{}{}", currency.symbol(), group_thousands(&format!("{:.2}", price)))
            }
            Some(price) => format!("{}{:.6}", currency.symbol(), price),
            None => "N/A".to_string(),
        }
    }

    /// Formatte l'offre en circulation, sans décimales : "19,687,500"
    pub fn display_supply(&self) -> String {
        match self.circulating_supply {
            Some(supply) => group_thousands(&format!("{:.0}", supply)),
            None => "N/A".to_string(),
        }
    }

    /// Horodatage API lisible : "2024-05-01 12:00:00 UTC" ou "N/A"
    pub fn display_last_updated(&self) -> String {
        match self.last_updated {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "N/A".to_string(),
        }
    }

    /// Nom tronqué à `max` caractères avec ellipse si nécessaire
    pub fn display_name(&self, max: usize) -> String {
        if self.name.chars().count() <= max {
            self.name.clone()
        } else {
            let truncated: String = self.name.chars().take(max.saturating_sub(1)).collect();
            format!("{}…", truncated)
        }
    }
}

/// Insère des virgules tous les 3 chiffres dans la partie entière
///
/// CONCEPT RUST : split_once + itération sur les chars
/// - "1234567.89" -> ("1234567", "89")
/// - On reconstruit la partie entière en insérant ',' depuis la droite
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: Option<f64>, supply: Option<f64>) -> MarketRow {
        MarketRow {
            id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            image_url: "https://example.com/btc.png".to_string(),
            current_price: price,
            circulating_supply: supply,
            last_updated: None,
        }
    }

    #[test]
    fn test_key_is_id() {
        assert_eq!(row(None, None).key(), "bitcoin");
    }

    #[test]
    fn test_display_price() {
        assert_eq!(row(Some(67012.5), None).display_price(Currency::Usd), "$67,012.50");
        assert_eq!(row(Some(0.5), None).display_price(Currency::Eur), "€0.500000");
        assert_eq!(row(None, None).display_price(Currency::Usd), "N/A");
    }

    #[test]
    fn test_display_supply() {
        assert_eq!(row(None, Some(19_687_500.0)).display_supply(), "19,687,500");
        assert_eq!(row(None, Some(999.0)).display_supply(), "999");
        assert_eq!(row(None, None).display_supply(), "N/A");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567.89"), "1,234,567.89");
        assert_eq!(group_thousands("-1000"), "-1,000");
        assert_eq!(group_thousands("12"), "12");
    }

    #[test]
    fn test_display_last_updated() {
        let mut r = row(None, None);
        assert_eq!(r.display_last_updated(), "N/A");

        r.last_updated = "2024-05-01T12:00:00.000Z".parse().ok();
        assert_eq!(r.display_last_updated(), "2024-05-01 12:00:00 UTC");
    }

    #[test]
    fn test_display_name_truncates() {
        let mut r = row(None, None);
        r.name = "Wrapped Liquid Staked Ether 2.0".to_string();
        assert_eq!(r.display_name(10), "Wrapped L…");
        assert_eq!(r.display_name(10).chars().count(), 10);
    }
}
