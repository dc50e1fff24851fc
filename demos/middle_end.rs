use minilang::{
    ast::{BinOp, Expr, Identifier, Literal, Program, Statement},
    compile,
    source::{Located, Position},
};

use std::rc::Rc;

fn main() {
    let program = sample();
    print!("Ast: {:#?}\n\n", program);

    match compile(&program) {
        Err(diagnostics) => eprint!("{}", diagnostics),

        Ok(code) => {
            for (index, instruction) in code.iter().enumerate() {
                println!("{:03}: {}", index, instruction);
            }
        }
    }
}

// var x = 2;
// var y = x * 3 + 1;
// if (y > 5) { print("grande", y); } else { print("chico"); }
fn sample() -> Program {
    let name = |text: &str, line, column| {
        Located::at(Identifier::from(text), Position::new(line, column))
    };
    let int = |value, line, column| {
        Expr::Literal(Located::at(Literal::Int(value), Position::new(line, column)))
    };
    let text = |value: &str, line, column| {
        Expr::Literal(Located::at(
            Literal::Str(Rc::from(value)),
            Position::new(line, column),
        ))
    };
    let var = |text: &str, line, column| Expr::Variable(name(text, line, column));
    let binary = |op, line, column, left, right| Expr::Binary {
        op: Located::at(op, Position::new(line, column)),
        left: Box::new(left),
        right: Box::new(right),
    };

    Program {
        statements: vec![
            Statement::VarDeclaration {
                name: name("x", 1, 5),
                init: Some(int(2, 1, 9)),
            },
            Statement::VarDeclaration {
                name: name("y", 2, 5),
                init: Some(binary(
                    BinOp::Add,
                    2,
                    15,
                    binary(BinOp::Mul, 2, 11, var("x", 2, 9), int(3, 2, 13)),
                    int(1, 2, 17),
                )),
            },
            Statement::If {
                condition: binary(BinOp::Greater, 3, 7, var("y", 3, 5), int(5, 3, 9)),
                then_branch: Box::new(Statement::Block(vec![Statement::Print(vec![
                    text("grande", 3, 20),
                    var("y", 3, 30),
                ])])),
                else_branch: Some(Box::new(Statement::Block(vec![Statement::Print(
                    vec![text("chico", 3, 48)],
                )]))),
            },
        ],
    }
}
