//! i18n module - Dutch/English UI text and the indicator catalog

mod catalog;

pub use catalog::{about_paragraphs, describe, display_label};

use serde::{Deserialize, Serialize};

/// Display language of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "nl")]
    #[value(name = "nl")]
    Nederlands,
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Nederlands, Language::English];

    pub fn name(self) -> &'static str {
        match self {
            Language::Nederlands => "Nederlands",
            Language::English => "English",
        }
    }
}

/// Every fixed string shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    AppTitle,
    SidebarTitle,
    LanguageLabel,
    SelectIndicator,
    YouSelected,
    YearLabel,
    ReferenceYearLabel,
    RegionLabel,
    NoRegion,
    ColorTheme,
    ChartKind,
    ChartBar,
    ChartHeatmap,
    ChartTrend,
    SortLabel,
    SortDescending,
    SortAscending,
    DataSource,
    OpenCsv,
    OpenGeoJson,
    ExportTable,
    ExportMap,
    Status,
    LabelColumnMissing,
    NoValidIndicators,
    AboutTitle,
    Highest,
    Lowest,
    Rising,
    Falling,
    SincePreviousYear,
    NoPreviousYear,
    ValueFor,
    NoValueFor,
    TableRegion,
    TableYear,
    TableValue,
    Statistics,
    Count,
    Mean,
    Median,
    StdDev,
    Maps,
    MapsUnavailable,
    NoData,
    Loading,
    Average,
}

/// Look up a UI string.
pub fn text(key: Key, lang: Language) -> &'static str {
    use Key::*;
    let (nl, en) = match key {
        AppTitle => ("Brede Welvaart van Nederland", "Broad Prosperity: Netherlands"),
        SidebarTitle => ("Indicatoren van brede welvaart", "Broad prosperity indicators"),
        LanguageLabel => ("Taal", "Language"),
        SelectIndicator => ("Kies een indicator:", "Select an indicator:"),
        YouSelected => ("Uw keuze", "You selected"),
        YearLabel => ("Jaar", "Year"),
        ReferenceYearLabel => ("Vergelijkingsjaar (kaart 2)", "Reference year (map 2)"),
        RegionLabel => ("Gemeente uitlichten", "Highlight municipality"),
        NoRegion => ("(geen)", "(none)"),
        ColorTheme => ("Kies een kleurthema", "Select a color theme"),
        ChartKind => ("Grafiek", "Chart"),
        ChartBar => ("Staafdiagram", "Bar chart"),
        ChartHeatmap => ("Heatmap", "Heatmap"),
        ChartTrend => ("Trend", "Trend"),
        SortLabel => ("Sortering", "Sort order"),
        SortDescending => ("Hoog → laag", "High → low"),
        SortAscending => ("Laag → hoog", "Low → high"),
        DataSource => ("Gegevensbron", "Data source"),
        OpenCsv => ("CSV openen…", "Open CSV…"),
        OpenGeoJson => ("GeoJSON openen…", "Open GeoJSON…"),
        ExportTable => ("Tabel exporteren", "Export table"),
        ExportMap => ("Kaart exporteren", "Export map"),
        Status => ("Status", "Status"),
        LabelColumnMissing => (
            "De kolom 'label' bestaat niet in de gegevens.",
            "The 'label' column does not exist in the DataFrame.",
        ),
        NoValidIndicators => (
            "Geen geldige indicatoren gevonden in de kolom 'label'.",
            "No valid indicators found in the 'label' column.",
        ),
        AboutTitle => ("Wat is de Brede Welvaart", "What is Broad Prosperity"),
        Highest => ("Hoogste", "Highest"),
        Lowest => ("Laagste", "Lowest"),
        Rising => ("Gestegen", "Rising"),
        Falling => ("Gedaald", "Falling"),
        SincePreviousYear => ("t.o.v. vorig jaar", "since previous year"),
        NoPreviousYear => ("Geen vorig jaar beschikbaar", "No previous year available"),
        ValueFor => ("Waarde voor", "Value for"),
        NoValueFor => ("Geen waarde beschikbaar voor", "No value available for"),
        TableRegion => ("Gemeente", "Municipality"),
        TableYear => ("Jaar", "Year"),
        TableValue => ("Waarde", "Value"),
        Statistics => ("Statistieken", "Statistics"),
        Count => ("Aantal", "Count"),
        Mean => ("Gemiddelde", "Mean"),
        Median => ("Mediaan", "Median"),
        StdDev => ("Standaardafwijking", "Std. dev."),
        Maps => ("Kaarten", "Maps"),
        MapsUnavailable => ("Geen kaartgegevens geladen", "No map shapes loaded"),
        NoData => ("Geen gegevens", "No data"),
        Loading => ("Laden…", "Loading…"),
        Average => ("Gemiddelde alle gemeenten", "Average of all municipalities"),
    };
    match lang {
        Language::Nederlands => nl,
        Language::English => en,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_switches_with_language() {
        assert_eq!(text(Key::Mean, Language::Nederlands), "Gemiddelde");
        assert_eq!(text(Key::Mean, Language::English), "Mean");
    }

    #[test]
    fn language_parses_from_short_codes() {
        #[derive(Deserialize)]
        struct Wrapper {
            lang: Language,
        }
        let w: Wrapper = toml::from_str("lang = \"en\"").unwrap();
        assert_eq!(w.lang, Language::English);
        assert_eq!(Language::default(), Language::Nederlands);
    }
}
