//! Código intermedio de tres direcciones.
//!
//! Cada instrucción opera sobre temporales `t<N>` y etiquetas `L<N>`,
//! ambos numerados desde cero por corrida del generador. La forma
//! textual canónica del listado es el `Display` de [`Instruction`].

use std::fmt::{self, Display, Formatter};

use crate::ast::{BinOp, Identifier, Literal, UnOp};

/// Registro temporal. `t0`, `t1`, ...
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Temp(pub u32);

/// Destino de salto. `L0`, `L1`, ...
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Label(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    LoadConst(Literal, Temp),
    LoadVar(Identifier, Temp),
    Store(Temp, Identifier),

    Binary {
        op: BinOp,
        dst: Temp,
        left: Temp,
        right: Temp,
    },

    Unary {
        op: UnOp,
        dst: Temp,
        operand: Temp,
    },

    SetLabel(Label),
    Jump(Label),
    JumpIfFalse(Temp, Label),
    JumpIfTrue(Temp, Label),

    Print(Temp),
    Input(Identifier),

    Call {
        target: Identifier,
        arguments: Vec<Temp>,
        output: Temp,
    },
}

impl Display for Temp {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        write!(fmt, "t{}", self.0)
    }
}

impl Display for Label {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        write!(fmt, "L{}", self.0)
    }
}

impl Display for Instruction {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::LoadConst(constant, dst) => write!(fmt, "ASSIGN {}, {}", dst, constant),
            Instruction::LoadVar(name, dst) => write!(fmt, "ASSIGN {}, {}", dst, name),
            Instruction::Store(src, name) => write!(fmt, "ASSIGN {}, {}", name, src),

            Instruction::Binary {
                op,
                dst,
                left,
                right,
            } => write!(fmt, "{} {}, {}, {}", binary_opcode(*op), dst, left, right),

            Instruction::Unary { op, dst, operand } => {
                write!(fmt, "{} {}, {}", unary_opcode(*op), dst, operand)
            }

            Instruction::SetLabel(label) => write!(fmt, "LABEL {}", label),
            Instruction::Jump(label) => write!(fmt, "GOTO {}", label),
            Instruction::JumpIfFalse(temp, label) => write!(fmt, "IF_FALSE {} GOTO {}", temp, label),
            Instruction::JumpIfTrue(temp, label) => write!(fmt, "IF_TRUE {} GOTO {}", temp, label),

            Instruction::Print(temp) => write!(fmt, "PRINT {}", temp),
            Instruction::Input(name) => write!(fmt, "INPUT {}", name),

            Instruction::Call {
                target,
                arguments,
                output,
            } => {
                write!(fmt, "CALL {}, {}", output, target)?;

                for argument in arguments {
                    write!(fmt, ", {}", argument)?;
                }

                Ok(())
            }
        }
    }
}

fn binary_opcode(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "ADD",
        BinOp::Sub => "SUB",
        BinOp::Mul => "MUL",
        BinOp::Div => "DIV",
        BinOp::Equal => "EQ",
        BinOp::NotEqual => "NEQ",
        BinOp::Less => "LT",
        BinOp::Greater => "GT",
        BinOp::LessOrEqual => "LTE",
        BinOp::GreaterOrEqual => "GTE",
        BinOp::And => "AND",
        BinOp::Or => "OR",
    }
}

fn unary_opcode(op: UnOp) -> &'static str {
    match op {
        UnOp::Not => "NOT",
        UnOp::Negate => "NEG",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn constants_render_like_source_literals() {
        let rendered: Vec<String> = [
            Instruction::LoadConst(Literal::Int(5), Temp(0)),
            Instruction::LoadConst(Literal::Float(5.0), Temp(1)),
            Instruction::LoadConst(Literal::Str(Rc::from("hola")), Temp(2)),
            Instruction::LoadConst(Literal::Bool(true), Temp(3)),
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(
            rendered,
            [
                "ASSIGN t0, 5",
                "ASSIGN t1, 5.0",
                "ASSIGN t2, \"hola\"",
                "ASSIGN t3, true",
            ]
        );
    }

    #[test]
    fn variable_moves_use_assign_in_both_directions() {
        let load = Instruction::LoadVar(Identifier::from("x"), Temp(4));
        let store = Instruction::Store(Temp(2), Identifier::from("x"));

        assert_eq!(load.to_string(), "ASSIGN t4, x");
        assert_eq!(store.to_string(), "ASSIGN x, t2");
    }

    #[test]
    fn binary_opcodes_cover_every_operator() {
        let rendered: Vec<String> = [
            BinOp::Add,
            BinOp::Sub,
            BinOp::Mul,
            BinOp::Div,
            BinOp::Equal,
            BinOp::NotEqual,
            BinOp::Less,
            BinOp::Greater,
            BinOp::LessOrEqual,
            BinOp::GreaterOrEqual,
            BinOp::And,
            BinOp::Or,
        ]
        .iter()
        .map(|op| {
            Instruction::Binary {
                op: *op,
                dst: Temp(2),
                left: Temp(0),
                right: Temp(1),
            }
            .to_string()
        })
        .collect();

        assert_eq!(
            rendered,
            [
                "ADD t2, t0, t1",
                "SUB t2, t0, t1",
                "MUL t2, t0, t1",
                "DIV t2, t0, t1",
                "EQ t2, t0, t1",
                "NEQ t2, t0, t1",
                "LT t2, t0, t1",
                "GT t2, t0, t1",
                "LTE t2, t0, t1",
                "GTE t2, t0, t1",
                "AND t2, t0, t1",
                "OR t2, t0, t1",
            ]
        );
    }

    #[test]
    fn unary_opcodes() {
        let negate = Instruction::Unary {
            op: UnOp::Negate,
            dst: Temp(3),
            operand: Temp(2),
        };
        let not = Instruction::Unary {
            op: UnOp::Not,
            dst: Temp(4),
            operand: Temp(3),
        };

        assert_eq!(negate.to_string(), "NEG t3, t2");
        assert_eq!(not.to_string(), "NOT t4, t3");
    }

    #[test]
    fn jumps_spell_goto_without_commas() {
        assert_eq!(Instruction::SetLabel(Label(0)).to_string(), "LABEL L0");
        assert_eq!(Instruction::Jump(Label(2)).to_string(), "GOTO L2");
        assert_eq!(
            Instruction::JumpIfFalse(Temp(3), Label(0)).to_string(),
            "IF_FALSE t3 GOTO L0"
        );
        assert_eq!(
            Instruction::JumpIfTrue(Temp(1), Label(0)).to_string(),
            "IF_TRUE t1 GOTO L0"
        );
    }

    #[test]
    fn io_instructions() {
        assert_eq!(Instruction::Print(Temp(4)).to_string(), "PRINT t4");
        assert_eq!(
            Instruction::Input(Identifier::from("x")).to_string(),
            "INPUT x"
        );
    }

    #[test]
    fn calls_list_output_then_target_then_arguments() {
        let call = Instruction::Call {
            target: Identifier::from("len"),
            arguments: vec![Temp(4)],
            output: Temp(5),
        };

        assert_eq!(call.to_string(), "CALL t5, len, t4");

        let niladic = Instruction::Call {
            target: Identifier::from("len"),
            arguments: Vec::new(),
            output: Temp(0),
        };

        assert_eq!(niladic.to_string(), "CALL t0, len");
    }
}
