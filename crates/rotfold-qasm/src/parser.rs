//! Line-oriented recursive-descent parser for the restricted
//! rotation-assembly dialect (spec.md §6).
//!
//! Grounded on `original_source/src/io.cpp`'s `importQasm`: strip
//! comments, split per line, recognize the eight gate keywords and the
//! register/version/include header keywords, and enforce axis
//! exclusivity per qubit via [`rotfold_ir::AxisTracker`].

use rotfold_ir::{AxisTracker, Gate, GateId, GateKind};
use tracing::warn;

use crate::ast::QubitRef;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, Token};
use crate::registry::Registry;

/// A fully parsed program: preserved header lines, the gate list with
/// matching angles, and the qubit registry used to name operands when
/// emitting.
#[derive(Debug)]
pub struct ParsedProgram {
    pub headers: Vec<String>,
    pub gates: Vec<Gate>,
    pub angles: Vec<f64>,
    pub registry: Registry,
}

const HEADER_KEYWORDS: [&str; 4] = ["OPENQASM", "include", "qreg", "creg"];

fn strip_line_comment(line: &str) -> &str {
    line.find("//").map_or(line, |at| &line[..at])
}

fn token_name(tok: &Token) -> &'static str {
    match tok {
        Token::LParen => "'('",
        Token::RParen => "')'",
        Token::LBracket => "'['",
        Token::RBracket => "']'",
        Token::Comma => "','",
        Token::Semicolon => "';'",
        Token::Number(_) => "a number",
        Token::Ident(_) => "an identifier",
    }
}

fn expect(tokens: &[Token], idx: usize, want: &Token, line: usize) -> ParseResult<()> {
    match tokens.get(idx) {
        Some(tok) if tok == want => Ok(()),
        Some(tok) => Err(ParseError::UnexpectedToken {
            line,
            expected: token_name(want),
            found: tok.to_string(),
        }),
        None => Err(ParseError::UnexpectedEof {
            line,
            expected: token_name(want),
        }),
    }
}

/// Parse one gate line's operand tokens, starting just after the gate
/// keyword: `(angle) reg[idx], reg[idx], ...;`
fn parse_gate_operands(tokens: &[Token], line: usize) -> ParseResult<(f64, Vec<QubitRef>)> {
    let mut idx = 1;
    expect(tokens, idx, &Token::LParen, line)?;
    idx += 1;

    let angle = match tokens.get(idx) {
        Some(Token::Number(n)) => *n,
        Some(tok) => {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: "a number",
                found: tok.to_string(),
            })
        }
        None => return Err(ParseError::UnexpectedEof { line, expected: "a number" }),
    };
    idx += 1;

    expect(tokens, idx, &Token::RParen, line)?;
    idx += 1;

    let mut qubits = Vec::new();
    loop {
        let register = match tokens.get(idx) {
            Some(Token::Ident(name)) => name.clone(),
            Some(tok) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "a register name",
                    found: tok.to_string(),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    line,
                    expected: "a register name",
                })
            }
        };
        idx += 1;

        expect(tokens, idx, &Token::LBracket, line)?;
        idx += 1;

        let index = match tokens.get(idx) {
            Some(Token::Number(n)) if *n >= 0.0 => *n as u32,
            Some(tok) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "a non-negative register index",
                    found: tok.to_string(),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    line,
                    expected: "a non-negative register index",
                })
            }
        };
        idx += 1;

        expect(tokens, idx, &Token::RBracket, line)?;
        idx += 1;

        qubits.push(QubitRef { register, index });

        match tokens.get(idx) {
            Some(Token::Comma) => {
                idx += 1;
            }
            Some(Token::Semicolon) => break,
            Some(tok) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "',' or ';'",
                    found: tok.to_string(),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    line,
                    expected: "',' or ';'",
                })
            }
        }
    }

    Ok((angle, qubits))
}

/// Parse a full program, enforcing same-angle agreement across every
/// gate line when `same_angle_mode` is set.
pub fn parse(input: &str, same_angle_mode: bool) -> ParseResult<ParsedProgram> {
    let mut registry = Registry::new();
    let mut tracker = AxisTracker::new();
    let mut headers = Vec::new();
    let mut gates = Vec::new();
    let mut angles = Vec::new();
    let mut first_angle: Option<f64> = None;
    let mut next_id = 0u32;

    for (zero_based_line, raw_line) in input.lines().enumerate() {
        let line = zero_based_line + 1;
        let trimmed = strip_line_comment(raw_line).trim();
        if trimmed.is_empty() {
            continue;
        }

        let tokens = tokenize(trimmed).map_err(|offset| ParseError::LexerError { line, offset })?;
        let Some(Token::Ident(keyword)) = tokens.first() else {
            warn!(line, text = trimmed, "ignoring line with no leading keyword");
            continue;
        };

        if let Some(kind) = GateKind::from_keyword(keyword) {
            let (angle, qubit_refs) = parse_gate_operands(&tokens, line)?;
            if qubit_refs.len() != kind.num_qubits() {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "the correct number of qubit operands",
                    found: format!("{} operands", qubit_refs.len()),
                });
            }

            if same_angle_mode {
                match first_angle {
                    None => first_angle = Some(angle),
                    Some(first) if (first - angle).abs() > 1e-12 => {
                        return Err(ParseError::SameAngleMismatch {
                            line,
                            first,
                            found: angle,
                        });
                    }
                    Some(_) => {}
                }
            }

            let qubit_ids: Vec<_> = qubit_refs.iter().map(|q| registry.intern(q)).collect();
            for &qubit in &qubit_ids {
                tracker
                    .observe(qubit, kind.axis())
                    .map_err(|source| ParseError::AxisConflict { line, source })?;
            }

            let id = GateId(next_id);
            next_id += 1;
            gates.push(Gate::new(id, kind, qubit_ids));
            angles.push(angle);
        } else if HEADER_KEYWORDS.contains(&keyword.as_str()) {
            headers.push(trimmed.to_string());
        } else {
            warn!(line, keyword, "ignoring unrecognized statement");
        }
    }

    Ok(ParsedProgram {
        headers,
        gates,
        angles,
        registry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_header_and_gate() {
        let src = "OPENQASM 3.0;\nqreg q[2];\nrz(1.5707963267948966) q[0];\n";
        let program = parse(src, false).unwrap();
        assert_eq!(program.headers, vec!["OPENQASM 3.0;", "qreg q[2];"]);
        assert_eq!(program.gates.len(), 1);
        assert_eq!(program.angles[0], std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_rejects_axis_conflict() {
        let src = "rx(0.1) q[0];\nry(0.2) q[0];\n";
        let err = parse(src, false).unwrap_err();
        assert!(matches!(err, ParseError::AxisConflict { .. }));
    }

    #[test]
    fn test_same_angle_mode_rejects_mismatch() {
        let src = "rz(0.1) q[0];\nrz(0.2) q[1];\n";
        let err = parse(src, true).unwrap_err();
        assert!(matches!(err, ParseError::SameAngleMismatch { .. }));
    }

    #[test]
    fn test_same_angle_mode_accepts_matching() {
        let src = "rz(0.1) q[0];\nrz(0.1) q[1];\n";
        let program = parse(src, true).unwrap();
        assert_eq!(program.gates.len(), 2);
    }

    #[test]
    fn test_two_qubit_gate_operand_count() {
        let src = "cp(0.3) q[0], q[1];\n";
        let program = parse(src, false).unwrap();
        assert_eq!(program.gates[0].qubits.len(), 2);
    }

    #[test]
    fn test_wrong_operand_count_rejected() {
        let src = "rz(0.1) q[0], q[1];\n";
        let err = parse(src, false).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }
}
