// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Tags that classify an `AD<V>` value; see [parent module](super).
// ---------------------------------------------------------------------------
//
// ADType
/// The AD types satisfy the order constants < dynamic parameters < variables.
///
/// If a result depends on two arguments, the type of the result is the
/// maximum of the type of its arguments. There is no separate tag for a
/// value that folds to an identical zero; such a value is recorded as a
/// `ConstantP` whose base value compares equal to zero (see `DESIGN.md`,
/// Open Question "identical_zero").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ADType {
    /// Does not depend on the domain variables or domain dynamic parameters.
    ConstantP,
    /// Depends on a domain dynamic parameter but not on a domain variable.
    DynamicP,
    /// Depends, directly or indirectly, on a domain variable.
    Variable,
}

impl ADType {
    pub fn is_constant(&self) -> bool {
        matches!(self, ADType::ConstantP)
    }
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ADType::DynamicP)
    }
    pub fn is_variable(&self) -> bool {
        matches!(self, ADType::Variable)
    }
    pub fn is_parameter(&self) -> bool {
        !self.is_variable()
    }
}

#[cfg(test)]
mod tests {
    use super::ADType;

    #[test]
    fn ordering() {
        assert!(ADType::ConstantP < ADType::DynamicP);
        assert!(ADType::DynamicP < ADType::Variable);
        assert_eq!(
            std::cmp::max(ADType::ConstantP, ADType::Variable),
            ADType::Variable
        );
    }
}
