use crate::{prelude::*, term::Production};

/// Stable handle of a rule inside the [`Grammar`] that declared it.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, derive_more::Display, Debug)]
#[display(fmt = "#{_0}")]
pub struct RuleId(usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Relative selection weight of a branch, `numer / denom`.
#[derive(PartialEq, Eq, Clone, Copy, derive_more::Display, Debug)]
#[display(fmt = "{numer}/{denom}")]
pub struct Weight {
    numer: u32,
    denom: u32,
}

impl Weight {
    pub const ONE: Self = Self { numer: 1, denom: 1 };

    pub fn new(weight: u32) -> Self {
        Self {
            numer: weight,
            denom: 1,
        }
    }

    pub fn ratio(numer: u32, denom: u32) -> Self {
        Self { numer, denom }
    }

    pub fn is_valid(self) -> bool {
        self.denom != 0
    }

    pub fn is_zero(self) -> bool {
        self.numer == 0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.numer) / f64::from(self.denom)
    }

    pub fn same_as(self, other: Self) -> bool {
        u64::from(self.numer) * u64::from(other.denom)
            == u64::from(other.numer) * u64::from(self.denom)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

#[derive(Clone, Debug)]
pub struct Branch {
    pub node: Production,
    pub weight: Weight,
}

impl Branch {
    pub fn new(node: Production) -> Self {
        Self {
            node,
            weight: Weight::ONE,
        }
    }

    pub fn weighted(node: Production, weight: Weight) -> Self {
        Self { node, weight }
    }
}

impl From<Production> for Branch {
    fn from(node: Production) -> Self {
        Self::new(node)
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub name: Identifier,
    pub branches: Vec<Branch>,
}

/// Arena of production rules. Rules refer to each other through [`RuleId`]s,
/// so a rule can mention itself before any of its branches exist.
#[derive(Clone, Default, Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    entry: Option<RuleId>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules.push(Rule {
            name: ident(name),
            branches: vec![],
        });
        id
    }

    /// Appends a branch to a rule declared in this grammar.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by [`Grammar::declare`] on this grammar.
    pub fn push_branch(&mut self, id: RuleId, branch: impl Into<Branch>) {
        self.rules[id.0].branches.push(branch.into());
    }

    /// Declares a rule and fills it in one go. Handy for rules that only
    /// reference rules declared earlier.
    pub fn define<B: Into<Branch>>(
        &mut self,
        name: &str,
        branches: impl IntoIterator<Item = B>,
    ) -> RuleId {
        let id = self.declare(name);
        for branch in branches {
            self.push_branch(id, branch);
        }
        id
    }

    pub fn set_entry(&mut self, id: RuleId) {
        self.entry = Some(id);
    }

    pub fn entry(&self) -> Option<RuleId> {
        self.entry
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<RuleId> {
        self.rules
            .iter()
            .position(|rule| rule.name.as_str() == name)
            .map(RuleId)
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId(i), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
