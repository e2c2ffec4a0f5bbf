//! Symbolic operand values.
//!
//! A `TargetExpr` is the backend's view of an operand whose final value
//! isn't known at lowering time: an optional symbol reference plus an
//! absolute constant. PC-relative subtraction is not part of the expression
//! itself; it is implied by the fixup kind the expression is attached to.

/// `symbol + constant`. With no symbol, the expression is an absolute
/// constant and always resolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetExpr {
    pub symbol: Option<String>,
    pub constant: i64,
}

impl TargetExpr {
    #[must_use]
    pub fn constant(value: i64) -> Self {
        Self {
            symbol: None,
            constant: value,
        }
    }

    #[must_use]
    pub fn symbol_ref(name: impl Into<String>, addend: i64) -> Self {
        Self {
            symbol: Some(name.into()),
            constant: addend,
        }
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.symbol.is_none()
    }

    /// Computes the numeric value of this expression, subtracting `place`
    /// (the address of the fixup site) when the fixup kind is PC-relative.
    /// Returns `None` when the expression names a symbol the supplied
    /// lookup cannot resolve; the caller then defers to a relocation.
    pub fn resolve(
        &self,
        lookup: impl Fn(&str) -> Option<u64>,
        place: u64,
        pc_rel: bool,
    ) -> Option<u64> {
        let base = match &self.symbol {
            Some(name) => lookup(name)?,
            None => 0,
        };
        let value = base.wrapping_add(self.constant as u64);
        if pc_rel {
            Some(value.wrapping_sub(place))
        } else {
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<u64> {
        (name == "callee").then_some(0x1000)
    }

    #[test]
    fn test_absolute_resolves_without_symbols() {
        let expr = TargetExpr::constant(0x44);
        assert_eq!(expr.resolve(|_| None, 0, false), Some(0x44));
    }

    #[test]
    fn test_pc_relative_subtracts_place() {
        let expr = TargetExpr::symbol_ref("callee", 4);
        assert_eq!(expr.resolve(lookup, 0x800, true), Some(0x804));
        assert_eq!(expr.resolve(lookup, 0x2000, true), Some(0x1004u64.wrapping_sub(0x2000)));
    }

    #[test]
    fn test_unknown_symbol_defers() {
        let expr = TargetExpr::symbol_ref("elsewhere", 0);
        assert_eq!(expr.resolve(lookup, 0, false), None);
    }
}
