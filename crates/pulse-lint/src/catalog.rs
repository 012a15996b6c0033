//! Static catalog of renderable component types.
//!
//! The renderer and the export pipeline dispatch on the same type names;
//! this module is the single place that knows which types exist, whether
//! they bind data, and what container shape that data must have.

/// Every component type the renderer supports, grouped by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComponentType {
    // charts
    BarChart,
    StackedBarMece,
    NpsStackedChart,
    SentimentChart,
    SentimentDivergentChart,
    SentimentThreeColorChart,
    SegmentationChart,
    WordCloud,
    // tables
    DistributionTable,
    SentimentImpactTable,
    PositiveCategoriesTable,
    NegativeCategoriesTable,
    TopCategoriesTable,
    AnalyticalTable,
    // cards
    NpsScoreCard,
    KpiCard,
    RecommendationsCard,
    // widgets
    Container,
    TextBlock,
}

pub const ALL_COMPONENT_TYPES: &[ComponentType] = &[
    ComponentType::BarChart,
    ComponentType::StackedBarMece,
    ComponentType::NpsStackedChart,
    ComponentType::SentimentChart,
    ComponentType::SentimentDivergentChart,
    ComponentType::SentimentThreeColorChart,
    ComponentType::SegmentationChart,
    ComponentType::WordCloud,
    ComponentType::DistributionTable,
    ComponentType::SentimentImpactTable,
    ComponentType::PositiveCategoriesTable,
    ComponentType::NegativeCategoriesTable,
    ComponentType::TopCategoriesTable,
    ComponentType::AnalyticalTable,
    ComponentType::NpsScoreCard,
    ComponentType::KpiCard,
    ComponentType::RecommendationsCard,
    ComponentType::Container,
    ComponentType::TextBlock,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentFamily {
    Chart,
    Table,
    Card,
    Widget,
}

/// Container shape a resolved `dataPath` value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataShape {
    /// A sequence of item records.
    Sequence,
    /// Either a bare sequence or a keyed wrapper with an `items` sequence.
    SequenceOrItems,
    /// A keyed record.
    Keyed,
    /// No data binding.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub requires_data: bool,
    pub shape: DataShape,
    pub allow_empty: bool,
}

impl CatalogEntry {
    const fn data(shape: DataShape, allow_empty: bool) -> Self {
        Self {
            requires_data: true,
            shape,
            allow_empty,
        }
    }

    const fn widget() -> Self {
        Self {
            requires_data: false,
            shape: DataShape::None,
            allow_empty: true,
        }
    }
}

impl ComponentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::BarChart => "barChart",
            ComponentType::StackedBarMece => "stackedBarMECE",
            ComponentType::NpsStackedChart => "npsStackedChart",
            ComponentType::SentimentChart => "sentimentChart",
            ComponentType::SentimentDivergentChart => "sentimentDivergentChart",
            ComponentType::SentimentThreeColorChart => "sentimentThreeColorChart",
            ComponentType::SegmentationChart => "segmentationChart",
            ComponentType::WordCloud => "wordCloud",
            ComponentType::DistributionTable => "distributionTable",
            ComponentType::SentimentImpactTable => "sentimentImpactTable",
            ComponentType::PositiveCategoriesTable => "positiveCategoriesTable",
            ComponentType::NegativeCategoriesTable => "negativeCategoriesTable",
            ComponentType::TopCategoriesTable => "topCategoriesTable",
            ComponentType::AnalyticalTable => "analyticalTable",
            ComponentType::NpsScoreCard => "npsScoreCard",
            ComponentType::KpiCard => "kpiCard",
            ComponentType::RecommendationsCard => "recommendationsCard",
            ComponentType::Container => "container",
            ComponentType::TextBlock => "textBlock",
        }
    }

    pub fn parse(s: &str) -> Option<ComponentType> {
        ALL_COMPONENT_TYPES.iter().copied().find(|t| t.as_str() == s)
    }

    pub fn family(self) -> ComponentFamily {
        match self {
            ComponentType::BarChart
            | ComponentType::StackedBarMece
            | ComponentType::NpsStackedChart
            | ComponentType::SentimentChart
            | ComponentType::SentimentDivergentChart
            | ComponentType::SentimentThreeColorChart
            | ComponentType::SegmentationChart
            | ComponentType::WordCloud => ComponentFamily::Chart,
            ComponentType::DistributionTable
            | ComponentType::SentimentImpactTable
            | ComponentType::PositiveCategoriesTable
            | ComponentType::NegativeCategoriesTable
            | ComponentType::TopCategoriesTable
            | ComponentType::AnalyticalTable => ComponentFamily::Table,
            ComponentType::NpsScoreCard
            | ComponentType::KpiCard
            | ComponentType::RecommendationsCard => ComponentFamily::Card,
            ComponentType::Container | ComponentType::TextBlock => ComponentFamily::Widget,
        }
    }

    pub fn entry(self) -> CatalogEntry {
        match self {
            ComponentType::BarChart => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::StackedBarMece => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::NpsStackedChart => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::SentimentChart => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::SentimentDivergentChart => {
                CatalogEntry::data(DataShape::Sequence, false)
            }
            ComponentType::SentimentThreeColorChart => {
                CatalogEntry::data(DataShape::Sequence, false)
            }
            ComponentType::SegmentationChart => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::WordCloud => CatalogEntry::data(DataShape::SequenceOrItems, true),
            ComponentType::DistributionTable => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::SentimentImpactTable => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::PositiveCategoriesTable => {
                CatalogEntry::data(DataShape::Sequence, false)
            }
            ComponentType::NegativeCategoriesTable => {
                CatalogEntry::data(DataShape::Sequence, false)
            }
            ComponentType::TopCategoriesTable => {
                CatalogEntry::data(DataShape::SequenceOrItems, false)
            }
            ComponentType::AnalyticalTable => CatalogEntry::data(DataShape::Sequence, false),
            ComponentType::NpsScoreCard => CatalogEntry::data(DataShape::Keyed, true),
            ComponentType::KpiCard => CatalogEntry::data(DataShape::Keyed, true),
            ComponentType::RecommendationsCard => {
                CatalogEntry::data(DataShape::SequenceOrItems, true)
            }
            ComponentType::Container | ComponentType::TextBlock => CatalogEntry::widget(),
        }
    }
}

/// Renders the full list of valid type names for unknown-type errors.
pub fn valid_type_names() -> String {
    let names: Vec<&str> = ALL_COMPONENT_TYPES.iter().map(|t| t.as_str()).collect();
    names.join(", ")
}

/// Expected component types for a known `dataPath` final segment. Unmapped
/// suffixes are not checked, so free-form keys never false-positive.
pub fn expected_types_for_suffix(suffix: &str) -> Option<&'static [ComponentType]> {
    Some(match suffix {
        "distributionChart" => &[ComponentType::BarChart, ComponentType::StackedBarMece],
        "barChart" => &[ComponentType::BarChart],
        "distributionTable" => &[ComponentType::DistributionTable],
        "npsStackedChart" => &[ComponentType::NpsStackedChart],
        "npsScore" => &[ComponentType::NpsScoreCard],
        "sentimentChart" => &[ComponentType::SentimentChart],
        "sentimentDivergentChart" => &[ComponentType::SentimentDivergentChart],
        "sentimentThreeColorChart" => &[ComponentType::SentimentThreeColorChart],
        "sentimentImpactTable" => &[ComponentType::SentimentImpactTable],
        "positiveCategories" => &[ComponentType::PositiveCategoriesTable],
        "negativeCategories" => &[ComponentType::NegativeCategoriesTable],
        "topCategories" => &[ComponentType::TopCategoriesTable],
        "wordCloud" => &[ComponentType::WordCloud],
        "segmentation" => &[ComponentType::SegmentationChart],
        _ => return None,
    })
}

/// Canonical NPS answer categories, in score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpsCategory {
    Detractor,
    Neutral,
    Promoter,
}

pub const NPS_CATEGORIES: &[NpsCategory] = &[
    NpsCategory::Detractor,
    NpsCategory::Neutral,
    NpsCategory::Promoter,
];

impl NpsCategory {
    pub fn label(self) -> &'static str {
        match self {
            NpsCategory::Detractor => "Detractor",
            NpsCategory::Neutral => "Neutral",
            NpsCategory::Promoter => "Promoter",
        }
    }

    /// Case-insensitive match over the spellings that occur in shipped
    /// documents, including plurals and Spanish variants.
    pub fn matches(self, label: &str) -> bool {
        let l = label.trim().to_ascii_lowercase();
        match self {
            NpsCategory::Detractor => {
                matches!(l.as_str(), "detractor" | "detractors" | "detractores")
            }
            NpsCategory::Neutral => matches!(
                l.as_str(),
                "neutral" | "neutrals" | "neutros" | "passive" | "passives"
            ),
            NpsCategory::Promoter => matches!(
                l.as_str(),
                "promoter" | "promoters" | "promotor" | "promotores"
            ),
        }
    }
}
