use minilang::{
    ast::{BinOp, Expr, Identifier, Literal, Program, Statement},
    compile,
    source::{Located, Position},
};

fn main() {
    // Cinco errores independientes; el análisis reporta todos en una
    // sola pasada en lugar de detenerse en el primero
    let program = broken();

    match compile(&program) {
        Ok(_) => println!("(sin errores)"),
        Err(diagnostics) => eprint!("{}", diagnostics),
    }
}

// var x = 1 && 2;
// y = 3;
// input(z);
// print(len(5));
// var x = 0;
fn broken() -> Program {
    let name = |text: &str, line, column| {
        Located::at(Identifier::from(text), Position::new(line, column))
    };
    let int = |value, line, column| {
        Expr::Literal(Located::at(Literal::Int(value), Position::new(line, column)))
    };

    Program {
        statements: vec![
            Statement::VarDeclaration {
                name: name("x", 1, 5),
                init: Some(Expr::Binary {
                    op: Located::at(BinOp::And, Position::new(1, 11)),
                    left: Box::new(int(1, 1, 9)),
                    right: Box::new(int(2, 1, 14)),
                }),
            },
            Statement::Assignment {
                target: name("y", 2, 1),
                value: int(3, 2, 5),
            },
            Statement::Input {
                target: name("z", 3, 7),
            },
            Statement::Print(vec![Expr::Call {
                target: name("len", 4, 7),
                arguments: vec![int(5, 4, 11)],
            }]),
            Statement::VarDeclaration {
                name: name("x", 5, 5),
                init: Some(int(0, 5, 9)),
            },
        ],
    }
}
