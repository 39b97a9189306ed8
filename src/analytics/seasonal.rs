use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::ProductId;

/// Southern hemisphere seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "verano")]
    Summer,
    #[serde(rename = "otoño")]
    Autumn,
    #[serde(rename = "invierno")]
    Winter,
    #[serde(rename = "primavera")]
    Spring,
}

impl Season {
    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }
}

/// Ordered keyword table; the first keyword found in a product name wins.
const SEASONAL_KEYWORDS: &[(&str, Season)] = &[
    ("chocolate caliente", Season::Winter),
    ("api morado", Season::Winter),
    ("ponche", Season::Winter),
    ("sopa", Season::Winter),
    ("canela", Season::Winter),
    ("helado", Season::Summer),
    ("frapp", Season::Summer),
    ("limonada", Season::Summer),
    ("granizado", Season::Summer),
    ("smoothie", Season::Summer),
    ("cold brew", Season::Summer),
    ("panet", Season::Summer),
    ("calabaza", Season::Autumn),
    ("pumpkin", Season::Autumn),
    ("manzana", Season::Autumn),
    ("frutilla", Season::Spring),
    ("fresa", Season::Spring),
    ("maracuy", Season::Spring),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAlert {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "palabra_clave")]
    pub keyword: String,
    #[serde(rename = "temporada")]
    pub season: Season,
    #[serde(rename = "en_temporada")]
    pub in_season: bool,
}

/// First keyword contained in `name`, ignoring case.
pub fn match_keyword(name: &str) -> Option<(&'static str, Season)> {
    let lowered = name.to_lowercase();
    SEASONAL_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .copied()
}

/// Tags every product whose name matches a seasonal keyword.
pub fn seasonal_alerts(names: &BTreeMap<ProductId, String>, today: NaiveDate) -> Vec<SeasonalAlert> {
    let current = Season::of(today);
    names
        .iter()
        .filter_map(|(&product_id, name)| {
            match_keyword(name).map(|(keyword, season)| SeasonalAlert {
                product_id,
                name: name.clone(),
                keyword: keyword.to_string(),
                season,
                in_season: season == current,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Season::Summer)]
    #[case(4, Season::Autumn)]
    #[case(7, Season::Winter)]
    #[case(10, Season::Spring)]
    #[case(12, Season::Summer)]
    fn months_map_to_southern_seasons(#[case] month: u32, #[case] expected: Season) {
        let date = NaiveDate::from_ymd_opt(2025, month, 15).unwrap();
        assert_eq!(Season::of(date), expected);
    }

    #[test]
    fn matching_ignores_case_and_keeps_table_order() {
        assert_eq!(
            match_keyword("HELADO de Chocolate Caliente"),
            Some(("chocolate caliente", Season::Winter))
        );
        assert_eq!(match_keyword("Frappé Moka"), Some(("frapp", Season::Summer)));
        assert_eq!(match_keyword("Espresso"), None);
    }

    #[test]
    fn keyword_may_appear_anywhere_in_the_name() {
        assert_eq!(
            match_keyword("Vaso de API MORADO"),
            Some(("api morado", Season::Winter))
        );
        assert_eq!(match_keyword("Malteada de frutilla"), Some(("frutilla", Season::Spring)));
    }

    #[test]
    fn in_season_reflects_run_date() {
        let mut names = BTreeMap::new();
        names.insert(1, "Helado de vainilla".to_string());
        names.insert(2, "Americano".to_string());
        names.insert(3, "Sopa de maní".to_string());

        let january = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let alerts = seasonal_alerts(&names, january);
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].in_season);
        assert!(!alerts[1].in_season);

        let json = serde_json::to_value(&alerts[1]).unwrap();
        assert_eq!(json["temporada"], "invierno");
        assert_eq!(json["palabra_clave"], "sopa");
    }
}
