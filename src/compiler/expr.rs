use crate::{
    ast::{
        ast::{Binding, Resolution},
        expressions::{BinaryExpr, BinaryOperator, Expr, ExprKind, IfExpr},
    },
    errors::errors::{Error, ErrorImpl},
    vm::{instructions::Instruction, MEMSIZE},
};

use super::compiler::CodeBuffer;

fn undecorated(node: String, line: u32) -> Error {
    Error::new(ErrorImpl::UndecoratedNode { node }, line)
}

/// Pushes the base address of the frame that declares `entry`, as seen from
/// the use site. The global frame sits at a fixed address.
fn frame_of(entry: &Binding, resolution: &Resolution) -> Vec<Instruction> {
    if entry.nesting_level == 0 {
        return vec![Instruction::Push(MEMSIZE)];
    }

    let mut code = vec![Instruction::LoadFp];
    code.extend((0..resolution.hops()).map(|_| Instruction::LoadWord));
    code
}

/// Code that evaluates `expression` and leaves its value on the stack.
pub fn gen_expression(buffer: &mut CodeBuffer, expression: &Expr) -> Result<Vec<Instruction>, Error> {
    let line = expression.line;
    match &expression.kind {
        ExprKind::Int(value) => Ok(vec![Instruction::Push(*value)]),
        ExprKind::Bool(value) => Ok(vec![Instruction::Push(*value as i32)]),
        // Never a heap address
        ExprKind::Null => Ok(vec![Instruction::Push(-1)]),
        ExprKind::Binary(binary) => gen_binary(buffer, binary),
        ExprKind::Not(inner) => {
            let mut code = vec![Instruction::Push(1)];
            code.extend(gen_expression(buffer, inner)?);
            code.push(Instruction::Sub);
            Ok(code)
        }
        ExprKind::If(conditional) => gen_if(buffer, conditional),
        ExprKind::Print(inner) => {
            let mut code = gen_expression(buffer, inner)?;
            code.push(Instruction::Print);
            Ok(code)
        }
        ExprKind::Id(id) => {
            let resolution = id
                .resolution
                .as_ref()
                .ok_or_else(|| undecorated(format!("identifier {}", id.name), line))?;
            let entry = &resolution.entry;

            if entry.nesting_level == 0 {
                return Ok(vec![
                    Instruction::Push(MEMSIZE + entry.offset),
                    Instruction::LoadWord,
                ]);
            }

            let mut code = frame_of(entry, resolution);
            code.extend([
                Instruction::Push(entry.offset),
                Instruction::Add,
                Instruction::LoadWord,
            ]);
            Ok(code)
        }
        ExprKind::Call(call) => {
            let resolution = call
                .resolution
                .as_ref()
                .ok_or_else(|| undecorated(format!("call of {}", call.name), line))?;
            let entry = &resolution.entry;

            // Control link, then the arguments with the first one nearest the new frame.
            let mut code = vec![Instruction::LoadFp];
            for argument in call.arguments.iter().rev() {
                code.extend(gen_expression(buffer, argument)?);
            }

            // Access link, duplicated through tm
            code.extend(frame_of(entry, resolution));
            code.extend([Instruction::StoreTm, Instruction::LoadTm, Instruction::LoadTm]);

            if entry.is_method {
                // A sibling method: the access link is the object, dispatch through it.
                code.push(Instruction::LoadWord);
            }
            code.extend([
                Instruction::Push(entry.offset),
                Instruction::Add,
                Instruction::LoadWord,
                Instruction::JumpSubroutine,
            ]);
            Ok(code)
        }
        ExprKind::New(new) => {
            let resolution = new
                .resolution
                .as_ref()
                .ok_or_else(|| undecorated(format!("instantiation of {}", new.class_name), line))?;

            let mut code = vec![];
            for argument in &new.arguments {
                code.extend(gen_expression(buffer, argument)?);
            }
            // Fields go to the heap last argument first, so field k ends up at object - k.
            for _ in &new.arguments {
                code.extend([
                    Instruction::LoadHp,
                    Instruction::StoreWord,
                    Instruction::LoadHp,
                    Instruction::Push(1),
                    Instruction::Add,
                    Instruction::StoreHp,
                ]);
            }
            code.extend([
                Instruction::Push(MEMSIZE + resolution.entry.offset),
                Instruction::LoadWord,
                Instruction::LoadHp,
                Instruction::StoreWord,
                Instruction::LoadHp,
                Instruction::LoadHp,
                Instruction::Push(1),
                Instruction::Add,
                Instruction::StoreHp,
            ]);
            Ok(code)
        }
        ExprKind::MethodCall(call) => {
            let entry = call
                .method_entry
                .as_ref()
                .ok_or_else(|| undecorated(format!("method call of {}", call.method), line))?;

            let mut code = vec![Instruction::LoadFp];
            for argument in call.arguments.iter().rev() {
                code.extend(gen_expression(buffer, argument)?);
            }
            // The object reference becomes the access link.
            code.extend(gen_expression(buffer, &call.receiver)?);
            code.extend([
                Instruction::StoreTm,
                Instruction::LoadTm,
                Instruction::LoadTm,
                Instruction::LoadWord,
                Instruction::Push(entry.offset),
                Instruction::Add,
                Instruction::LoadWord,
                Instruction::JumpSubroutine,
            ]);
            Ok(code)
        }
    }
}

fn gen_binary(buffer: &mut CodeBuffer, binary: &BinaryExpr) -> Result<Vec<Instruction>, Error> {
    match binary.operator {
        BinaryOperator::And | BinaryOperator::Or => return gen_short_circuit(buffer, binary),
        _ => {}
    }

    let labels = match binary.operator {
        BinaryOperator::Equal | BinaryOperator::LessEqual | BinaryOperator::GreaterEqual => {
            Some((buffer.fresh_label(), buffer.fresh_label()))
        }
        _ => None,
    };

    let mut code = gen_expression(buffer, &binary.left)?;
    code.extend(gen_expression(buffer, &binary.right)?);

    match (binary.operator, labels) {
        (BinaryOperator::Plus, _) => code.push(Instruction::Add),
        (BinaryOperator::Minus, _) => code.push(Instruction::Sub),
        (BinaryOperator::Times, _) => code.push(Instruction::Mult),
        (BinaryOperator::Div, _) => code.push(Instruction::Div),
        (operator, Some((ok, end))) => {
            match operator {
                BinaryOperator::Equal => code.push(Instruction::BranchEqual(ok.clone())),
                BinaryOperator::LessEqual => code.push(Instruction::BranchLessEqual(ok.clone())),
                // left >= right  as  right <= left. The operands are swapped
                // through tm and the free cell at hp, which lies below the stack.
                _ => code.extend([
                    Instruction::StoreTm,
                    Instruction::LoadHp,
                    Instruction::StoreWord,
                    Instruction::LoadTm,
                    Instruction::LoadHp,
                    Instruction::LoadWord,
                    Instruction::BranchLessEqual(ok.clone()),
                ]),
            }
            code.extend(select(ok, end));
        }
        (_, None) => {}
    }

    Ok(code)
}

/// Turns a taken/not-taken branch into 1/0 on the stack.
fn select(ok: String, end: String) -> [Instruction; 5] {
    [
        Instruction::Push(0),
        Instruction::Branch(end.clone()),
        Instruction::Label(ok),
        Instruction::Push(1),
        Instruction::Label(end),
    ]
}

fn gen_short_circuit(buffer: &mut CodeBuffer, binary: &BinaryExpr) -> Result<Vec<Instruction>, Error> {
    let short = buffer.fresh_label();
    let end = buffer.fresh_label();

    // `&&` stops at the first 0, `||` at the first 1.
    let (stop_on, result_on_stop) = match binary.operator {
        BinaryOperator::And => (0, 0),
        _ => (1, 1),
    };

    let mut code = gen_expression(buffer, &binary.left)?;
    code.extend([Instruction::Push(stop_on), Instruction::BranchEqual(short.clone())]);
    code.extend(gen_expression(buffer, &binary.right)?);
    code.extend([
        Instruction::Push(stop_on),
        Instruction::BranchEqual(short.clone()),
        Instruction::Push(1 - result_on_stop),
        Instruction::Branch(end.clone()),
        Instruction::Label(short),
        Instruction::Push(result_on_stop),
        Instruction::Label(end),
    ]);

    Ok(code)
}

fn gen_if(buffer: &mut CodeBuffer, conditional: &IfExpr) -> Result<Vec<Instruction>, Error> {
    let then_label = buffer.fresh_label();
    let end = buffer.fresh_label();

    let mut code = gen_expression(buffer, &conditional.condition)?;
    code.extend([Instruction::Push(1), Instruction::BranchEqual(then_label.clone())]);
    code.extend(gen_expression(buffer, &conditional.else_branch)?);
    code.extend([Instruction::Branch(end.clone()), Instruction::Label(then_label)]);
    code.extend(gen_expression(buffer, &conditional.then_branch)?);
    code.push(Instruction::Label(end));

    Ok(code)
}
