//! Pruebas de integración de la etapa media completa.
//!
//! Cada caso arma un árbol como lo entregaría el parser externo y
//! verifica el listado textual o el lote de diagnósticos que produce
//! `minilang::compile`.

use minilang::{
    ast::{BinOp, Expr, Identifier, Literal, Program, Statement},
    compile,
    source::{Located, Position},
};

use std::rc::Rc;

fn name(text: &str, line: u32, column: u32) -> Located<Identifier> {
    Located::at(Identifier::from(text), Position::new(line, column))
}

fn int(value: i32, line: u32, column: u32) -> Expr {
    Expr::Literal(Located::at(Literal::Int(value), Position::new(line, column)))
}

fn float(value: f64, line: u32, column: u32) -> Expr {
    Expr::Literal(Located::at(
        Literal::Float(value),
        Position::new(line, column),
    ))
}

fn text(value: &str, line: u32, column: u32) -> Expr {
    Expr::Literal(Located::at(
        Literal::Str(Rc::from(value)),
        Position::new(line, column),
    ))
}

fn var(text: &str, line: u32, column: u32) -> Expr {
    Expr::Variable(name(text, line, column))
}

fn binary(op: BinOp, line: u32, column: u32, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op: Located::at(op, Position::new(line, column)),
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn listing(program: &Program) -> Vec<String> {
    compile(program)
        .expect("el programa debía compilar")
        .iter()
        .map(ToString::to_string)
        .collect()
}

// var n = 3;
// while (n > 0) { print(n); n = n - 1; }
// if (n == 0) { print("despegue"); } else { print("error"); }
#[test]
fn countdown_compiles_to_the_expected_listing() {
    let program = Program {
        statements: vec![
            Statement::VarDeclaration {
                name: name("n", 1, 5),
                init: Some(int(3, 1, 9)),
            },
            Statement::While {
                condition: binary(BinOp::Greater, 2, 10, var("n", 2, 8), int(0, 2, 12)),
                body: Box::new(Statement::Block(vec![
                    Statement::Print(vec![var("n", 2, 23)]),
                    Statement::Assignment {
                        target: name("n", 2, 27),
                        value: binary(BinOp::Sub, 2, 33, var("n", 2, 31), int(1, 2, 35)),
                    },
                ])),
            },
            Statement::If {
                condition: binary(BinOp::Equal, 3, 7, var("n", 3, 5), int(0, 3, 10)),
                then_branch: Box::new(Statement::Block(vec![Statement::Print(vec![text(
                    "despegue", 3, 21,
                )])])),
                else_branch: Some(Box::new(Statement::Block(vec![Statement::Print(vec![
                    text("error", 3, 48),
                ])]))),
            },
        ],
    };

    assert_eq!(
        listing(&program),
        [
            "ASSIGN t0, 3",
            "ASSIGN n, t0",
            "LABEL L0",
            "ASSIGN t1, n",
            "ASSIGN t2, 0",
            "GT t3, t1, t2",
            "IF_FALSE t3 GOTO L1",
            "ASSIGN t4, n",
            "PRINT t4",
            "ASSIGN t5, n",
            "ASSIGN t6, 1",
            "SUB t7, t5, t6",
            "ASSIGN n, t7",
            "GOTO L0",
            "LABEL L1",
            "ASSIGN t8, n",
            "ASSIGN t9, 0",
            "EQ t10, t8, t9",
            "IF_FALSE t10 GOTO L2",
            "ASSIGN t11, \"despegue\"",
            "PRINT t11",
            "GOTO L3",
            "LABEL L2",
            "ASSIGN t12, \"error\"",
            "PRINT t12",
            "LABEL L3",
        ]
    );
}

// for (var i = 0; i < 2; i = i + 1) { print(i); }
#[test]
fn counted_loop_tests_its_condition_at_the_bottom() {
    let program = Program {
        statements: vec![Statement::For {
            init: Some(Box::new(Statement::VarDeclaration {
                name: name("i", 1, 10),
                init: Some(int(0, 1, 14)),
            })),
            condition: Some(binary(BinOp::Less, 1, 19, var("i", 1, 17), int(2, 1, 21))),
            update: Some(Box::new(Statement::Assignment {
                target: name("i", 1, 24),
                value: binary(BinOp::Add, 1, 30, var("i", 1, 28), int(1, 1, 32)),
            })),
            body: Box::new(Statement::Block(vec![Statement::Print(vec![var(
                "i", 1, 43,
            )])])),
        }],
    };

    assert_eq!(
        listing(&program),
        [
            "ASSIGN t0, 0",
            "ASSIGN i, t0",
            "GOTO L1",
            "LABEL L0",
            "ASSIGN t1, i",
            "PRINT t1",
            "LABEL L2",
            "ASSIGN t2, i",
            "ASSIGN t3, 1",
            "ADD t4, t2, t3",
            "ASSIGN i, t4",
            "LABEL L1",
            "ASSIGN t5, i",
            "ASSIGN t6, 2",
            "LT t7, t5, t6",
            "IF_TRUE t7 GOTO L0",
            "LABEL L3",
        ]
    );
}

// var f = 0.5;
// var n = 1;
// f = n;
// input(f);
// print(f + n);
#[test]
fn widening_and_io_survive_the_whole_pipeline() {
    let program = Program {
        statements: vec![
            Statement::VarDeclaration {
                name: name("f", 1, 5),
                init: Some(float(0.5, 1, 9)),
            },
            Statement::VarDeclaration {
                name: name("n", 2, 5),
                init: Some(int(1, 2, 9)),
            },
            Statement::Assignment {
                target: name("f", 3, 1),
                value: var("n", 3, 5),
            },
            Statement::Input {
                target: name("f", 4, 7),
            },
            Statement::Print(vec![binary(
                BinOp::Add,
                5,
                9,
                var("f", 5, 7),
                var("n", 5, 11),
            )]),
        ],
    };

    assert_eq!(
        listing(&program),
        [
            "ASSIGN t0, 0.5",
            "ASSIGN f, t0",
            "ASSIGN t1, 1",
            "ASSIGN n, t1",
            "ASSIGN t2, n",
            "ASSIGN f, t2",
            "INPUT f",
            "ASSIGN t3, f",
            "ASSIGN t4, n",
            "ADD t5, t3, t4",
            "PRINT t5",
        ]
    );
}

// var x = 1 && 2;
// y = 5;
// print(len(5));
#[test]
fn broken_program_reports_every_error_and_yields_no_code() {
    let program = Program {
        statements: vec![
            Statement::VarDeclaration {
                name: name("x", 1, 5),
                init: Some(binary(BinOp::And, 1, 11, int(1, 1, 9), int(2, 1, 14))),
            },
            Statement::Assignment {
                target: name("y", 2, 1),
                value: int(5, 2, 5),
            },
            Statement::Print(vec![Expr::Call {
                target: name("len", 3, 7),
                arguments: vec![int(5, 3, 11)],
            }]),
        ],
    };

    let diagnostics = compile(&program).expect_err("el programa no debía compilar");

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(
        diagnostics.to_string(),
        "Errores semánticos encontrados:\n  \
         1. Error de tipo en línea 1, col 11: operador '&&' incompatible con tipos 'int' y 'int'\n  \
         2. Error semántico en línea 2, columna 1: Variable 'y' no declarada antes de la asignación\n  \
         3. Error de tipo en línea 3, col 7: función 'len' espera un string, recibió 'int'\n"
    );
}

// El mismo árbol compilado dos veces numera temporales y etiquetas
// desde cero en ambas corridas.
#[test]
fn compilation_is_deterministic_across_runs() {
    let program = Program {
        statements: vec![
            Statement::VarDeclaration {
                name: name("x", 1, 5),
                init: Some(int(1, 1, 9)),
            },
            Statement::While {
                condition: binary(BinOp::Less, 2, 10, var("x", 2, 8), int(9, 2, 12)),
                body: Box::new(Statement::Assignment {
                    target: name("x", 2, 17),
                    value: binary(BinOp::Add, 2, 23, var("x", 2, 21), int(1, 2, 25)),
                }),
            },
        ],
    };

    assert_eq!(listing(&program), listing(&program));
    assert_eq!(listing(&program)[0], "ASSIGN t0, 1");
}
