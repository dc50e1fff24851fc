//! Punto de entrada ("driver").
//!
//! Este módulo orquesta las fases de la etapa media y expone una CLI
//! mínima sobre programas de muestra.

use anyhow::Context;
use clap::{self, crate_version, Arg};
use minilang::{
    ast::{BinOp, Expr, Identifier, Literal, Program, Statement, UnOp},
    error::Diagnostics,
    ir::Instruction,
    lower::Generator,
    semantic::Analyzer,
    source::{Located, Position},
};

use std::{
    fs::File,
    io::{self, Write},
    process,
    rc::Rc,
};

fn main() -> anyhow::Result<()> {
    // Parsing de CLI
    let args = clap::App::new("MiniLang")
        .version(crate_version!())
        .arg(
            Arg::new("programa")
                .short('p')
                .long("programa")
                .value_name("NOMBRE")
                .takes_value(true)
                .default_value("factorial")
                .possible_values(["factorial", "saludo"])
                .help("Programa de muestra a compilar"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .takes_value(true)
                .default_value("-")
                .value_name("ARCHIVO")
                .help("Listado de salida ('-' para stdout)"),
        )
        .get_matches();

    let program = match args.value_of("programa").unwrap() {
        "factorial" => sample_factorial(),
        "saludo" => sample_saludo(),
        _ => unreachable!(),
    };

    let output = args.value_of("output").unwrap();

    eprintln!("Analizando semánticamente...");

    let mut analyzer = Analyzer::new();
    if !analyzer.analyze(&program) {
        eprint!("{}", Diagnostics::from(analyzer.into_diagnostics()));
        eprintln!("--- Compilación Fallida ---");
        process::exit(1);
    }

    eprintln!("Generando código intermedio...");
    let code = Generator::new().generate(&program);
    eprintln!("--- Compilación Exitosa ---");

    match output {
        "-" => {
            let stdout = io::stdout();
            write_listing(&mut stdout.lock(), &code).context("No se pudo escribir el listado")?;
        }

        path => {
            let mut file = File::create(path)
                .with_context(|| format!("No se pudo abrir para escritura: {}", path))?;

            write_listing(&mut file, &code)
                .with_context(|| format!("No se pudo escribir el listado: {}", path))?;
        }
    }

    Ok(())
}

fn write_listing(out: &mut dyn Write, code: &[Instruction]) -> io::Result<()> {
    for (index, instruction) in code.iter().enumerate() {
        writeln!(out, "{:03}: {}", index, instruction)?;
    }

    Ok(())
}

// Los programas de muestra sustituyen al frontend externo mientras la
// integración no esté lista. Deberían eliminarse en ese momento.

fn at(line: u32, column: u32) -> Position {
    Position::new(line, column)
}

fn name(text: &str, line: u32, column: u32) -> Located<Identifier> {
    Located::at(Identifier::from(text), at(line, column))
}

fn int(value: i32, line: u32, column: u32) -> Expr {
    Expr::Literal(Located::at(Literal::Int(value), at(line, column)))
}

fn text(value: &str, line: u32, column: u32) -> Expr {
    Expr::Literal(Located::at(Literal::Str(Rc::from(value)), at(line, column)))
}

fn var(text: &str, line: u32, column: u32) -> Expr {
    Expr::Variable(name(text, line, column))
}

fn binary(op: BinOp, line: u32, column: u32, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op: Located::at(op, at(line, column)),
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Cálculo iterativo de 5! con un lazo de conteo y un reporte final.
fn sample_factorial() -> Program {
    let statements = vec![
        Statement::VarDeclaration {
            name: name("n", 1, 5),
            init: Some(int(5, 1, 9)),
        },
        Statement::VarDeclaration {
            name: name("resultado", 2, 5),
            init: Some(int(1, 2, 17)),
        },
        Statement::VarDeclaration {
            name: name("i", 3, 5),
            init: Some(int(1, 3, 9)),
        },
        Statement::While {
            condition: binary(BinOp::LessOrEqual, 4, 10, var("i", 4, 8), var("n", 4, 13)),
            body: Box::new(Statement::Block(vec![
                Statement::Assignment {
                    target: name("resultado", 5, 5),
                    value: binary(
                        BinOp::Mul,
                        5,
                        27,
                        var("resultado", 5, 17),
                        var("i", 5, 29),
                    ),
                },
                Statement::Assignment {
                    target: name("i", 6, 5),
                    value: binary(BinOp::Add, 6, 11, var("i", 6, 9), int(1, 6, 13)),
                },
            ])),
        },
        Statement::Print(vec![
            text("factorial de", 8, 7),
            var("n", 8, 23),
            text("es", 8, 26),
            var("resultado", 8, 32),
        ]),
        Statement::For {
            init: Some(Box::new(Statement::VarDeclaration {
                name: name("j", 9, 10),
                init: Some(int(1, 9, 14)),
            })),
            condition: Some(binary(
                BinOp::LessOrEqual,
                9,
                19,
                var("j", 9, 17),
                int(3, 9, 22),
            )),
            update: Some(Box::new(Statement::Assignment {
                target: name("j", 9, 25),
                value: binary(BinOp::Add, 9, 31, var("j", 9, 29), int(1, 9, 33)),
            })),
            body: Box::new(Statement::Block(vec![Statement::Print(vec![
                var("j", 10, 11),
                binary(
                    BinOp::Sub,
                    10,
                    24,
                    var("resultado", 10, 14),
                    var("j", 10, 26),
                ),
            ])])),
        },
        Statement::If {
            condition: binary(
                BinOp::Greater,
                12,
                15,
                var("resultado", 12, 5),
                int(100, 12, 17),
            ),
            then_branch: Box::new(Statement::Block(vec![Statement::Print(vec![text(
                "resultado grande",
                13,
                11,
            )])])),
            else_branch: Some(Box::new(Statement::Block(vec![Statement::Print(vec![
                Expr::Unary {
                    op: Located::at(UnOp::Negate, at(15, 11)),
                    operand: Box::new(var("resultado", 15, 12)),
                },
            ])]))),
        },
    ];

    Program { statements }
}

/// Entrada interactiva, concatenación y la función `len`.
fn sample_saludo() -> Program {
    let statements = vec![
        Statement::VarDeclaration {
            name: name("nombre", 1, 5),
            init: Some(text("", 1, 14)),
        },
        Statement::Print(vec![text("Ingrese su nombre:", 2, 7)]),
        Statement::Input {
            target: name("nombre", 3, 7),
        },
        Statement::VarDeclaration {
            name: name("saludo", 4, 5),
            init: Some(binary(
                BinOp::Add,
                4,
                23,
                text("Hola, ", 4, 14),
                var("nombre", 4, 25),
            )),
        },
        Statement::VarDeclaration {
            name: name("largo", 5, 5),
            init: Some(Expr::Call {
                target: name("len", 5, 13),
                arguments: vec![var("nombre", 5, 17)],
            }),
        },
        Statement::Print(vec![var("saludo", 6, 7)]),
        Statement::If {
            condition: binary(
                BinOp::Equal,
                7,
                11,
                var("largo", 7, 5),
                int(0, 7, 14),
            ),
            then_branch: Box::new(Statement::Block(vec![Statement::Print(vec![text(
                "nombre vacío",
                8,
                11,
            )])])),
            else_branch: Some(Box::new(Statement::Block(vec![Statement::Print(vec![
                text("caracteres:", 10, 11),
                var("largo", 10, 25),
            ])]))),
        },
    ];

    Program { statements }
}
