use crate::error::{DiagnosisError, Result};
use std::collections::BTreeMap;

/// Maps diagnosis names to class ids and back.
///
/// Classes are the sorted distinct names seen while fitting; a class id is the
/// name's position in that list.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classes: Vec<String> = names.into_iter().map(String::from).collect();
        classes.sort();
        classes.dedup();
        LabelEncoder { classes }
    }

    /// Fits on `names` and returns the class id of each name, in order.
    pub fn fit_transform<'a, I>(names: I) -> (Self, Vec<usize>)
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let names = names.into_iter();
        let encoder = Self::fit(names.clone());
        let ids: BTreeMap<&str, usize> = encoder
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let targets = names.map(|n| ids[n]).collect();
        (encoder, targets)
    }

    pub fn encode(&self, name: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(name))
            .ok()
    }

    pub fn decode(&self, id: usize) -> Result<&str> {
        self.classes
            .get(id)
            .map(String::as_str)
            .ok_or(DiagnosisError::UnknownClass(id))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
