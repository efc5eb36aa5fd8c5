//! Decoding of literal tokens into AST literal values.
//!
//! The lexer records only a lexeme symbol and a base; integers are
//! decoded here with `from_str_radix`, and an out-of-range literal is
//! reported by the caller as a deferred diagnostic. Floats are never
//! decoded in the front-end; they stay symbolic.

use jacy_lexer::{LitKind, TokenLit};
use jacy_span::{Interner, Kw, Symbol};

/// Integer width fixed by a literal suffix; `Unset` when no suffix was
/// written. Do not default the kind of an int.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IntKind {
    Unset,
    I8,
    I16,
    I32,
    I64,
    Int,
    U8,
    U16,
    U32,
    U64,
    Uint,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FloatKind {
    Unset,
    F32,
    F64,
}

/// A decoded literal as stored in the AST.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LitValue {
    Bool(bool),
    Int { val: u64, kind: IntKind },
    /// Value kept as the lexeme symbol; semantic interpretation is
    /// deferred past the front-end.
    Float { sym: Symbol, kind: FloatKind },
    Str { sym: Symbol },
}

/// Failure to decode; reported by the caller against the token span.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LitDecodeError {
    OutOfRange,
}

impl LitValue {
    /// Decode a literal token.
    pub fn from_token(lit: TokenLit, interner: &Interner) -> Result<LitValue, LitDecodeError> {
        match lit.kind {
            LitKind::Bool => {
                if lit.sym.is_specific_kw(Kw::True) {
                    Ok(LitValue::Bool(true))
                } else if lit.sym.is_specific_kw(Kw::False) {
                    Ok(LitValue::Bool(false))
                } else {
                    panic!("[DEV] bool literal token with non-bool symbol");
                }
            }
            kind if kind.is_int() => {
                let base = kind.base().expect("integer kind without a base");
                let val = interner
                    .with_resolved(lit.sym, |digits| u64::from_str_radix(digits, base))
                    .expect("literal symbol must resolve")
                    .map_err(|_| LitDecodeError::OutOfRange)?;
                Ok(LitValue::Int {
                    val,
                    kind: int_kind(lit.suffix, interner),
                })
            }
            LitKind::Float => Ok(LitValue::Float {
                sym: lit.sym,
                kind: float_kind(lit.suffix, interner),
            }),
            LitKind::SqStr | LitKind::DqStr => Ok(LitValue::Str { sym: lit.sym }),
            _ => unreachable!(),
        }
    }
}

fn int_kind(suffix: Option<Symbol>, interner: &Interner) -> IntKind {
    let Some(suffix) = suffix else {
        return IntKind::Unset;
    };
    interner
        .with_resolved(suffix, |text| match text {
            "i8" => IntKind::I8,
            "i16" => IntKind::I16,
            "i32" => IntKind::I32,
            "i64" => IntKind::I64,
            "int" => IntKind::Int,
            "u8" => IntKind::U8,
            "u16" => IntKind::U16,
            "u32" => IntKind::U32,
            "u64" => IntKind::U64,
            "uint" => IntKind::Uint,
            other => panic!("[DEV] lexer let through unknown int suffix `{other}`"),
        })
        .expect("suffix symbol must resolve")
}

fn float_kind(suffix: Option<Symbol>, interner: &Interner) -> FloatKind {
    let Some(suffix) = suffix else {
        return FloatKind::Unset;
    };
    interner
        .with_resolved(suffix, |text| match text {
            "f32" => FloatKind::F32,
            "f64" => FloatKind::F64,
            other => panic!("[DEV] lexer let through unknown float suffix `{other}`"),
        })
        .expect("suffix symbol must resolve")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacy_span::Interner;
    use pretty_assertions::assert_eq;

    fn int_lit(interner: &Interner, kind: LitKind, digits: &str, suffix: Option<&str>) -> TokenLit {
        TokenLit::new(
            kind,
            interner.intern(digits),
            suffix.map(|s| interner.intern(s)),
        )
    }

    #[test]
    fn decodes_each_base() {
        let interner = Interner::new();
        let cases = [
            (LitKind::Dec, "42", 42u64),
            (LitKind::Bin, "101", 5),
            (LitKind::Oct, "17", 15),
            (LitKind::Hex, "ff", 255),
        ];
        for (kind, digits, expected) in cases {
            let lit = int_lit(&interner, kind, digits, None);
            assert_eq!(
                LitValue::from_token(lit, &interner).unwrap(),
                LitValue::Int {
                    val: expected,
                    kind: IntKind::Unset
                }
            );
        }
    }

    #[test]
    fn suffix_fixes_the_kind() {
        let interner = Interner::new();
        let lit = int_lit(&interner, LitKind::Dec, "1", Some("u8"));
        assert_eq!(
            LitValue::from_token(lit, &interner).unwrap(),
            LitValue::Int {
                val: 1,
                kind: IntKind::U8
            }
        );
    }

    #[test]
    fn out_of_range_is_deferred_not_fatal() {
        let interner = Interner::new();
        let lit = int_lit(&interner, LitKind::Dec, "99999999999999999999999999", None);
        assert_eq!(
            LitValue::from_token(lit, &interner),
            Err(LitDecodeError::OutOfRange)
        );
    }

    #[test]
    fn floats_are_not_evaluated() {
        let interner = Interner::new();
        let sym = interner.intern("1.5e300");
        let lit = TokenLit::new(LitKind::Float, sym, Some(interner.intern("f32")));
        assert_eq!(
            LitValue::from_token(lit, &interner).unwrap(),
            LitValue::Float {
                sym,
                kind: FloatKind::F32
            }
        );
    }
}
