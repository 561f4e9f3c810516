use crate::processing::grain_size::FolkWardStatistics;

/// Verbal sorting class for a Folk & Ward sorting value (phi).
pub fn sorting_class(sorting: f64) -> &'static str {
    if sorting < 0.35 {
        "Very well sorted"
    } else if sorting < 0.50 {
        "Well sorted"
    } else if sorting < 0.71 {
        "Moderately well sorted"
    } else if sorting < 1.00 {
        "Moderately sorted"
    } else if sorting < 2.00 {
        "Poorly sorted"
    } else if sorting < 4.00 {
        "Very poorly sorted"
    } else {
        "Extremely poorly sorted"
    }
}

pub fn skewness_class(skewness: f64) -> &'static str {
    if skewness > 0.3 {
        "Very fine skewed"
    } else if skewness > 0.1 {
        "Fine skewed"
    } else if skewness >= -0.1 {
        "Near symmetrical"
    } else if skewness >= -0.3 {
        "Coarse skewed"
    } else {
        "Very coarse skewed"
    }
}

pub fn kurtosis_class(kurtosis: f64) -> &'static str {
    if kurtosis < 0.67 {
        "Very platykurtic"
    } else if kurtosis < 0.90 {
        "Platykurtic"
    } else if kurtosis <= 1.11 {
        "Mesokurtic"
    } else if kurtosis <= 1.50 {
        "Leptokurtic"
    } else if kurtosis <= 3.00 {
        "Very leptokurtic"
    } else {
        "Extremely leptokurtic"
    }
}

/// Wentworth size class for a phi value.
pub fn size_class(phi: f64) -> &'static str {
    if phi < -1.0 {
        "Gravel"
    } else if phi < 0.0 {
        "Very coarse sand"
    } else if phi < 1.0 {
        "Coarse sand"
    } else if phi < 2.0 {
        "Medium sand"
    } else if phi < 3.0 {
        "Fine sand"
    } else if phi < 4.0 {
        "Very fine sand"
    } else if phi < 8.0 {
        "Silt"
    } else {
        "Clay"
    }
}

/// All descriptors for one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptors {
    pub mean: &'static str,
    pub sorting: &'static str,
    pub skewness: &'static str,
    pub kurtosis: Option<&'static str>,
}

impl Descriptors {
    pub fn describe(stats: &FolkWardStatistics) -> Self {
        Self {
            mean: size_class(stats.mean),
            sorting: sorting_class(stats.sorting),
            skewness: skewness_class(stats.skewness),
            kurtosis: stats.kurtosis.map(kurtosis_class),
        }
    }
}
