//! Indicator Catalog
//! Maps indicator labels (as they appear in the CSV) to their English name,
//! broad-prosperity theme and an optional note.

use super::Language;

/// Broad prosperity theme an indicator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    SubjectiveWellbeing,
    MaterialWelfare,
    Health,
    LabourAndLeisure,
    Housing,
    Society,
    Safety,
    Environment,
    EconomicCapital,
    NaturalCapital,
    HumanCapital,
    SocialCapital,
}

impl Theme {
    pub fn name(self, lang: Language) -> &'static str {
        let (nl, en) = match self {
            Theme::SubjectiveWellbeing => ("Subjectief welzijn", "Subjective well-being"),
            Theme::MaterialWelfare => ("Materiële welvaart", "Material welfare"),
            Theme::Health => ("Gezondheid", "Health"),
            Theme::LabourAndLeisure => ("Arbeid en vrije tijd", "Labour and leisure"),
            Theme::Housing => ("Wonen", "Housing"),
            Theme::Society => ("Samenleving", "Society"),
            Theme::Safety => ("Veiligheid", "Safety"),
            Theme::Environment => ("Milieu", "Environment"),
            Theme::EconomicCapital => ("Economisch kapitaal", "Economic capital"),
            Theme::NaturalCapital => ("Natuurlijk kapitaal", "Natural capital"),
            Theme::HumanCapital => ("Menselijk kapitaal", "Human capital"),
            Theme::SocialCapital => ("Sociaal kapitaal", "Social capital"),
        };
        match lang {
            Language::Nederlands => nl,
            Language::English => en,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Note {
    ModelEstimates,
    IncomePriceCorrection,
    Provisional2022,
}

impl Note {
    fn text(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Note::ModelEstimates, Language::Nederlands) => {
                "Voorlopige cijfers. Bij het toevoegen van een nieuw jaar schat het model alle \
                 jaren uit de reeks opnieuw. Raadpleeg de Technische Toelichting voor meer uitleg \
                 over de interpretatie van de modelschattingen en de marges."
            }
            (Note::ModelEstimates, Language::English) => {
                "Provisional figures. When a new year is added the model re-estimates every year \
                 in the series. See the Technical Explanation for how to interpret the model \
                 estimates and their margins."
            }
            (Note::IncomePriceCorrection, Language::Nederlands) => {
                "2021 zijn voorlopige cijfers en de correctie voor de prijsverandering in 2021 is \
                 gebaseerd op de onderzoeksreeks consumentenprijzen, die de daadwerkelijk betaalde \
                 energieprijzen gebruikt. Deze sluit gemiddeld genomen meer aan bij de \
                 prijsontwikkeling die de bevolking heeft ervaren dan de consumentenprijsindex."
            }
            (Note::IncomePriceCorrection, Language::English) => {
                "2021 figures are provisional. The 2021 price correction uses the experimental \
                 consumer price series based on energy prices actually paid, which on average \
                 tracks the price development people experienced more closely than the consumer \
                 price index."
            }
            (Note::Provisional2022, Language::Nederlands) => "2022 cijfers zijn voorlopig.",
            (Note::Provisional2022, Language::English) => "2022 figures are provisional.",
        }
    }
}

struct Entry {
    label: &'static str,
    english: &'static str,
    theme: Theme,
    note: Option<Note>,
}

const fn entry(label: &'static str, english: &'static str, theme: Theme) -> Entry {
    Entry {
        label,
        english,
        theme,
        note: None,
    }
}

const fn noted(label: &'static str, english: &'static str, theme: Theme, note: Note) -> Entry {
    Entry {
        label,
        english,
        theme,
        note: Some(note),
    }
}

use Theme::*;

// One entry per label.
static CATALOG: &[Entry] = &[
    noted(
        "Tevredenheid met het leven",
        "Satisfaction with life",
        SubjectiveWellbeing,
        Note::ModelEstimates,
    ),
    noted(
        "Tevredenheid met vrije tijd",
        "Satisfaction with leisure time",
        SubjectiveWellbeing,
        Note::ModelEstimates,
    ),
    noted(
        "Mediaan besteedbaar inkomen",
        "Median disposable income",
        MaterialWelfare,
        Note::IncomePriceCorrection,
    ),
    noted(
        "Bruto binnenlands product",
        "Gross domestic product",
        MaterialWelfare,
        Note::Provisional2022,
    ),
    entry("Overgewicht", "Overweight", Health),
    entry("Levensverwachting bevolking", "Life expectancy", Health),
    entry(
        "Personen met één of meer langdurige ziekten of aandoeningen",
        "Persons with one or more long-term illnesses",
        Health,
    ),
    entry("Nettoarbeidsparticipatie", "Net labour participation", LabourAndLeisure),
    entry("Brutoarbeidsparticipatie", "Gross labour participation", LabourAndLeisure),
    entry("Werkloosheid", "Unemployment", LabourAndLeisure),
    entry("Vacaturegraad", "Job vacancy rate", LabourAndLeisure),
    entry("Afstand tot ov", "Distance to public transport", LabourAndLeisure),
    entry("Tevredenheid met woonomgeving", "Satisfaction with living environment", Housing),
    entry("Tevredenheid met woning", "Satisfaction with dwelling", Housing),
    entry("Afstand tot sportterrein", "Distance to sports grounds", Housing),
    entry("Afstand tot basisschool", "Distance to primary school", Housing),
    entry("Afstand tot café e.d.", "Distance to cafés and the like", Housing),
    entry(
        "Contact met familie, vrienden of buren",
        "Contact with family, friends or neighbours",
        Society,
    ),
    entry("Vertrouwen in instituties", "Trust in institutions", Society),
    entry("Vertrouwen in anderen", "Trust in others", Society),
    entry("Vrijwilligerswerk", "Volunteering", Society),
    entry("Vaak onveilig voelen in de buurt", "Often feeling unsafe in the neighbourhood", Safety),
    entry("Aantal ondervonden delicten", "Number of crimes experienced", Safety),
    entry("Geregistreerde misdrijven", "Registered crimes", Safety),
    entry("Natuurgebied per inwoner", "Nature area per inhabitant", Environment),
    entry("Afstand tot openbaar groen", "Distance to public green space", Environment),
    entry(
        "Broeikasgasemissies per inwoner",
        "Greenhouse gas emissions per inhabitant",
        Environment,
    ),
    entry(
        "Kwaliteit van zwemwater binnenwateren",
        "Bathing water quality, inland waters",
        Environment,
    ),
    entry(
        "Kwaliteit van zwemwater kustwateren",
        "Bathing water quality, coastal waters",
        Environment,
    ),
    entry("Gemiddelde schuld per huishouden", "Average debt per household", EconomicCapital),
    entry("Mediaan vermogen van huishoudens", "Median household wealth", EconomicCapital),
    entry("Particuliere zonne-energie", "Private solar energy", NaturalCapital),
    entry("Natuur- en bosgebieden", "Nature and forest areas", NaturalCapital),
    entry("Bebouwd terrein", "Built-up land", NaturalCapital),
    entry(
        "Emissies van fijnstof naar lucht",
        "Particulate matter emissions to air",
        NaturalCapital,
    ),
    entry("Fosfaatuitscheiding landbouw", "Phosphate excretion in agriculture", NaturalCapital),
    entry(
        "Groen-blauwe ruimte, exclusief reguliere landbouw",
        "Green-blue space, excluding regular agriculture",
        NaturalCapital,
    ),
    entry("Stikstofuitscheiding landbouw", "Nitrogen excretion in agriculture", NaturalCapital),
    entry("Arbeidsduur per week", "Working hours per week", HumanCapital),
    entry("Hoogopgeleide bevolking", "Highly educated population", HumanCapital),
    entry("Ervaren gezondheid", "Perceived health", HumanCapital),
    entry("Sociale cohesie", "Social cohesion", SocialCapital),
];

fn lookup(label: &str) -> Option<&'static Entry> {
    let label = label.trim();
    CATALOG.iter().find(|e| e.label == label)
}

/// Text shown in the indicator description panel.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDescription {
    pub title: String,
    pub theme: Option<Theme>,
    pub theme_sentence: Option<String>,
    pub note: String,
}

/// Describe an indicator. Unknown labels get a generic description.
pub fn describe(label: &str, lang: Language) -> IndicatorDescription {
    let shown = display_label(label, lang);
    let title = match lang {
        Language::Nederlands => format!("Welkom bij {} indicator", shown),
        Language::English => format!("Welcome to the {} indicator", shown),
    };

    let Some(entry) = lookup(label) else {
        let note = match lang {
            Language::Nederlands => "Geen beschrijving beschikbaar voor deze indicator.",
            Language::English => "No description available for this indicator.",
        };
        return IndicatorDescription {
            title,
            theme: None,
            theme_sentence: None,
            note: note.to_string(),
        };
    };

    let theme_name = entry.theme.name(lang);
    let theme_sentence = match lang {
        Language::Nederlands => {
            format!("Deze indicator is onderdeel van het {} thema.", theme_name)
        }
        Language::English => format!("This indicator is part of the {} theme.", theme_name),
    };
    let note = entry
        .note
        .map(|n| n.text(lang).to_string())
        .unwrap_or_default();

    IndicatorDescription {
        title,
        theme: Some(entry.theme),
        theme_sentence: Some(theme_sentence),
        note,
    }
}

/// Label to show for an indicator in the active language.
pub fn display_label(label: &str, lang: Language) -> String {
    match (lang, lookup(label)) {
        (Language::English, Some(entry)) => entry.english.to_string(),
        _ => label.to_string(),
    }
}

/// Paragraphs of the "what is broad prosperity" panel.
pub fn about_paragraphs(lang: Language) -> [&'static str; 2] {
    match lang {
        Language::Nederlands => [
            "Brede welvaart gaat over alles wat het leven ‘de moeite waard maakt’. Het gaat over \
             inkomen en werk, maar ook over de woonkwaliteit, natuur, gezondheid en het \
             welbevinden van mensen. Dat is het uitgangspunt achter het concept ‘brede welvaart’. \
             Het is een andere manier van kijken naar de samenleving. Integraal, met oog voor de \
             samenhang tussen de factoren die er voor de inwoners toe doen.",
            "CMO STAMM werkt aan de verbetering van de brede welvaart in het Noorden. Dit doen wij \
             door bewustwording te vergroten, het monitoren en uitvoeren van onderzoek en het \
             ontwikkelen van een visie en strategie voor beleid.",
        ],
        Language::English => [
            "Broad prosperity is about everything that makes life ‘worth living’. It covers income \
             and work, but also the quality of housing, nature, health and people's well-being. \
             That is the starting point of the ‘broad prosperity’ concept: a different, integral \
             way of looking at society, with an eye for how the factors that matter to residents \
             relate to each other.",
            "CMO STAMM works on improving broad prosperity in the North of the Netherlands by \
             raising awareness, monitoring and carrying out research, and developing a vision and \
             strategy for policy.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG[i + 1..].iter().all(|b| b.label != a.label),
                "duplicate label {}",
                a.label
            );
        }
    }

    #[test]
    fn describes_known_indicator_in_both_languages() {
        let nl = describe("Werkloosheid", Language::Nederlands);
        assert_eq!(nl.title, "Welkom bij Werkloosheid indicator");
        assert_eq!(nl.theme, Some(Theme::LabourAndLeisure));
        assert_eq!(
            nl.theme_sentence.as_deref(),
            Some("Deze indicator is onderdeel van het Arbeid en vrije tijd thema.")
        );

        let en = describe("Werkloosheid", Language::English);
        assert_eq!(en.title, "Welcome to the Unemployment indicator");
        assert!(en.theme_sentence.unwrap().contains("Labour and leisure"));
    }

    #[test]
    fn reclassified_labels_use_capital_themes() {
        assert_eq!(
            describe("Hoogopgeleide bevolking", Language::Nederlands).theme,
            Some(Theme::HumanCapital)
        );
        assert_eq!(
            describe("Emissies van fijnstof naar lucht", Language::Nederlands).theme,
            Some(Theme::NaturalCapital)
        );
    }

    #[test]
    fn notes_are_attached_where_present() {
        let bbp = describe("Bruto binnenlands product", Language::Nederlands);
        assert_eq!(bbp.note, "2022 cijfers zijn voorlopig.");
        assert!(describe("Overgewicht", Language::English).note.is_empty());
    }

    #[test]
    fn unknown_indicator_falls_back() {
        let d = describe("Iets onbekends", Language::English);
        assert_eq!(d.theme, None);
        assert_eq!(d.title, "Welcome to the Iets onbekends indicator");
        assert!(d.note.starts_with("No description"));
        assert_eq!(display_label("Iets onbekends", Language::English), "Iets onbekends");
    }

    #[test]
    fn display_label_translates_only_in_english() {
        assert_eq!(display_label(" Overgewicht ", Language::English), "Overweight");
        assert_eq!(display_label("Overgewicht", Language::Nederlands), "Overgewicht");
    }
}
