//! The catalog used when the configuration names no countries or
//! indicators.

use econdw_core::{
  catalog::{CountrySpec, HistoryDepth, IndicatorSpec},
  measure::MeasureKind,
};

pub fn indicators() -> Vec<IndicatorSpec> {
  [
    ("Inflación", "FP.CPI.TOTL.ZG", "%", MeasureKind::Inflation),
    ("Crecimiento PIB", "NY.GDP.MKTP.KD.ZG", "%", MeasureKind::GdpGrowth),
    ("Tipo de Cambio Dólar", "PA.NUS.FCRF", "Moneda Local/USD", MeasureKind::ExchangeRate),
    ("IPC", "FP.CPI.TOTL", "Índice", MeasureKind::Cpi),
  ]
  .into_iter()
  .map(|(name, code, unit, kind)| IndicatorSpec {
    name: name.to_string(),
    code: code.to_string(),
    unit: unit.to_string(),
    kind,
    description: None,
  })
  .collect()
}

/// Chile keeps its full history; every other country keeps ten years.
pub fn countries() -> Vec<CountrySpec> {
  const RECENT: HistoryDepth = HistoryDepth::Years(10);

  let mut out = vec![CountrySpec::new("Chile", "CHL", HistoryDepth::All)];
  out.extend(
    [
      ("ARG", "Argentina"),
      ("BRA", "Brasil"),
      ("MEX", "México"),
      ("COL", "Colombia"),
      ("PER", "Perú"),
      ("USA", "Estados Unidos"),
      ("CAN", "Canadá"),
      ("DEU", "Alemania"),
      ("ESP", "España"),
      ("JPN", "Japón"),
      ("CHN", "China"),
      ("GBR", "Reino Unido"),
      ("AUS", "Australia"),
      ("IND", "India"),
      ("ZAF", "Sudáfrica"),
      ("FRA", "Francia"),
      ("ITA", "Italia"),
      ("RUS", "Rusia"),
      ("CHE", "Suiza"),
      ("SWE", "Suecia"),
      ("NOR", "Noruega"),
      ("DNK", "Dinamarca"),
      ("FIN", "Finlandia"),
      ("NLD", "Países Bajos"),
      ("BEL", "Bélgica"),
      ("PRT", "Portugal"),
      ("GRC", "Grecia"),
      ("TUR", "Turquía"),
      ("SAU", "Arabia Saudita"),
    ]
    .into_iter()
    .map(|(iso, name)| CountrySpec::new(name, iso, RECENT)),
  );
  out
}
