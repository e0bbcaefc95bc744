use cynic_parser::{
    ExecutableDocument,
    executable::{ExecutableDefinition, Selection},
};
use indexmap::IndexMap;

/// Fragment name to the fragment names it spreads, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FragmentDependencies<'a>(IndexMap<&'a str, Vec<&'a str>>);

impl<'a> FragmentDependencies<'a> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Spreads of the given fragment. `None` if no fragment with that name was defined.
    pub fn get(&self, fragment_name: &str) -> Option<&[&'a str]> {
        self.0.get(fragment_name).map(Vec::as_slice)
    }

    pub fn fragment_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a str])> + '_ {
        self.0.iter().map(|(name, spreads)| (*name, spreads.as_slice()))
    }
}

impl<'a> FromIterator<(&'a str, Vec<&'a str>)> for FragmentDependencies<'a> {
    fn from_iter<T: IntoIterator<Item = (&'a str, Vec<&'a str>)>>(iter: T) -> Self {
        FragmentDependencies(iter.into_iter().collect())
    }
}

/// Collects the direct spreads of every fragment defined in the document.
///
/// Spreads nested in fields and inline fragments count as direct spreads of the enclosing
/// fragment. Spreads are not followed: the body of a spread fragment is only reached through
/// its own entry. A fragment defined twice keeps its first position and its last body.
pub fn build_dependencies(document: &ExecutableDocument) -> FragmentDependencies<'_> {
    let mut dependencies = IndexMap::new();

    for definition in document.definitions() {
        let ExecutableDefinition::Fragment(fragment) = definition else {
            continue;
        };

        let mut spreads = Vec::new();
        collect_spreads(fragment.selection_set(), &mut spreads);
        dependencies.insert(fragment.name(), spreads);
    }

    FragmentDependencies(dependencies)
}

fn collect_spreads<'a>(selection_set: impl IntoIterator<Item = Selection<'a>>, spreads: &mut Vec<&'a str>) {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => collect_spreads(field.selection_set(), spreads),
            Selection::InlineFragment(inline_fragment) => collect_spreads(inline_fragment.selection_set(), spreads),
            Selection::FragmentSpread(fragment_spread) => spreads.push(fragment_spread.fragment_name()),
        }
    }
}
