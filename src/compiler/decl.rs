use crate::{
    ast::{
        declarations::{ClassDecl, Decl, MethodDecl},
        expressions::Expr,
    },
    errors::errors::{Error, ErrorImpl},
    vm::instructions::Instruction,
};

use super::{compiler::CodeBuffer, expr::gen_expression};

/// Code that leaves the declaration's runtime value on the stack, in its frame slot.
pub fn gen_declaration(buffer: &mut CodeBuffer, declaration: &Decl) -> Result<Vec<Instruction>, Error> {
    match declaration {
        Decl::Var(var) => gen_expression(buffer, &var.value),
        Decl::Fun(fun) => {
            let declarations = gen_declarations(buffer, &fun.declarations)?;
            let label = buffer.fresh_function_label();
            gen_routine(
                buffer,
                &label,
                fun.parameters.len(),
                declarations,
                fun.declarations.len(),
                &fun.body,
            )?;

            Ok(vec![Instruction::PushLabel(label)])
        }
    }
}

fn gen_declarations(buffer: &mut CodeBuffer, declarations: &[Decl]) -> Result<Vec<Instruction>, Error> {
    let mut code = vec![];
    for declaration in declarations {
        code.extend(gen_declaration(buffer, declaration)?);
    }
    Ok(code)
}

/// Emits a function or method body into the code segment.
///
/// On entry the stack holds the control link, the arguments and the access
/// link; the frame pointer is set to the access link's cell.
fn gen_routine(
    buffer: &mut CodeBuffer,
    label: &str,
    parameter_count: usize,
    declarations: Vec<Instruction>,
    declaration_count: usize,
    body: &Expr,
) -> Result<(), Error> {
    let body = gen_expression(buffer, body)?;

    let mut code = vec![
        Instruction::Label(label.to_string()),
        Instruction::CopyFp,
        Instruction::LoadRa,
    ];
    code.extend(declarations);
    code.extend(body);
    code.push(Instruction::StoreTm);
    code.extend((0..declaration_count).map(|_| Instruction::Pop));
    code.push(Instruction::StoreRa);
    // access link
    code.push(Instruction::Pop);
    code.extend((0..parameter_count).map(|_| Instruction::Pop));
    code.extend([
        Instruction::StoreFp,
        Instruction::LoadTm,
        Instruction::LoadRa,
        Instruction::JumpSubroutine,
    ]);

    buffer.put_code(code);
    Ok(())
}

fn gen_method(buffer: &mut CodeBuffer, method: &MethodDecl) -> Result<String, Error> {
    let label = buffer.fresh_function_label();
    let declarations = gen_declarations(buffer, &method.declarations)?;
    gen_routine(
        buffer,
        &label,
        method.parameters.len(),
        declarations,
        method.declarations.len(),
        &method.body,
    )?;

    Ok(label)
}

/// Lowers the methods and builds the dispatch table on the heap.
///
/// The value left on the stack is the table's base address.
pub fn gen_class(buffer: &mut CodeBuffer, class: &ClassDecl) -> Result<Vec<Instruction>, Error> {
    let mut dispatch_table: Vec<(i32, String)> = vec![];
    for method in &class.methods {
        let slot = method.offset.ok_or_else(|| {
            Error::new(
                ErrorImpl::UndecoratedNode {
                    node: format!("method {}.{}", class.name, method.name),
                },
                method.line,
            )
        })?;
        let label = gen_method(buffer, method)?;
        buffer.record_method_label(&class.name, &method.name, &label);
        dispatch_table.push((slot, label));
    }
    dispatch_table.sort_by_key(|(slot, _)| *slot);

    let mut code = vec![Instruction::LoadHp];
    for (_, label) in dispatch_table {
        code.extend([
            Instruction::PushLabel(label),
            Instruction::LoadHp,
            Instruction::StoreWord,
            Instruction::LoadHp,
            Instruction::Push(1),
            Instruction::Add,
            Instruction::StoreHp,
        ]);
    }

    Ok(code)
}
