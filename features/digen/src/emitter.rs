//! Rendering of resolvers into source text.
//!
//! Emitters only lay out text. Which members a resolver has, and in which order, is decided
//! before they are called.

use digen_config::config::{EmitOptions, Markers};

use crate::{
    composer::ResolverOutput,
    implementation::{Call, CallTarget, FunctionImplementation, Statement},
};

/// Turns resolver outputs into the text of one generated file
pub trait Emitter {
    fn emit(&self, imports: &[String], resolvers: &[ResolverOutput]) -> String;
}

/// Emits every resolver as an interface extending its provider, plus two extensions holding the
/// resolve and intercept implementations
pub struct ProtocolEmitter {
    options: EmitOptions,
    markers: Markers,
}
impl ProtocolEmitter {
    pub fn new(options: EmitOptions, markers: Markers) -> Self {
        Self { options, markers }
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(self.options.indent * depth)
    }

    fn preamble(&self) -> String {
        [&self.markers.injectable, &self.markers.provider]
            .iter()
            .map(|marker| format!("public protocol {marker} {{}}\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn resolver(&self, resolver: &ResolverOutput) -> String {
        let mut conformances = vec![resolver.provider_name.clone()];
        conformances.extend(resolver.inherited_resolver_names.iter().cloned());

        let groups: Vec<String> = [&resolver.resolve_signatures, &resolver.intercept_signatures]
            .into_iter()
            .filter(|signatures| !signatures.is_empty())
            .map(|signatures| {
                signatures
                    .iter()
                    .map(|signature| format!("{}{signature}\n", self.indent(1)))
                    .collect::<String>()
            })
            .collect();

        let mut out = format!(
            "protocol {}: {} {{\n{}}}\n",
            resolver.name,
            conformances.join(", "),
            groups.join("\n")
        );

        for implementations in [
            &resolver.resolve_implementations,
            &resolver.intercept_implementations,
        ] {
            if implementations.is_empty() {
                continue;
            }
            let body: Vec<String> = implementations
                .iter()
                .map(|implementation| self.implementation(implementation))
                .collect();
            out.push_str(&format!(
                "\nextension {} {{\n\n{}}}\n",
                resolver.name,
                body.join("\n")
            ));
        }

        out
    }

    fn implementation(&self, implementation: &FunctionImplementation) -> String {
        let mut lines = vec![format!("{}{} {{", self.indent(1), implementation.signature)];
        self.statements(&implementation.body, 2, &mut lines);
        lines.push(format!("{}}}", self.indent(1)));

        lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line + "\n")
            .collect()
    }

    fn statements(&self, statements: &[Statement], depth: usize, lines: &mut Vec<String>) {
        let indent = self.indent(depth);
        for statement in statements {
            match statement {
                Statement::Bind { name, call } => {
                    lines.push(format!("{indent}let {name} = {}", render_call(call)));
                }
                Statement::ReturnIntercepted { interceptor, body } => {
                    lines.push(format!("{indent}return {interceptor} {{"));
                    self.statements(body, depth + 1, lines);
                    lines.push(format!("{indent}}}"));
                }
                Statement::Return(call) => {
                    lines.push(format!("{indent}return {}", render_call(call)));
                }
            }
        }
    }
}
impl Emitter for ProtocolEmitter {
    fn emit(&self, imports: &[String], resolvers: &[ResolverOutput]) -> String {
        let mut sections: Vec<String> = Vec::new();

        if self.options.imports && !imports.is_empty() {
            sections.push(
                imports
                    .iter()
                    .map(|module| format!("import {module}\n"))
                    .collect(),
            );
        }
        if self.options.preamble {
            sections.push(self.preamble());
        }
        for resolver in resolvers {
            tracing::trace!("Emitting {}", resolver.name);
            sections.push(self.resolver(resolver));
        }

        sections.join("\n")
    }
}

/// `name(label: binding, ...)`, or `.name(...)` for members; `_` labels pass the binding alone
fn render_call(call: &Call) -> String {
    let arguments: Vec<String> = call
        .arguments
        .iter()
        .map(|argument| match argument.label.as_str() {
            "_" => argument.binding_name().to_string(),
            label => format!("{label}: {}", argument.binding_name()),
        })
        .collect();

    match &call.target {
        CallTarget::Function(name) => format!("{name}({})", arguments.join(", ")),
        CallTarget::Member(name) => format!(".{name}({})", arguments.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Argument, FunctionScope, FunctionSignature};

    fn emitter() -> ProtocolEmitter {
        ProtocolEmitter::new(
            EmitOptions {
                indent: 4,
                preamble: false,
                imports: true,
            },
            Markers::default(),
        )
    }

    fn signature(name: &str, arguments: Vec<Argument>, returns: &str) -> FunctionSignature {
        FunctionSignature::new(
            FunctionScope::Instance,
            name,
            arguments,
            Some(returns.to_string()),
        )
    }

    #[test]
    fn renders_calls() {
        let call = Call::member(
            "init",
            vec![
                Argument::with_binding("session", "urlSession", "URLSession"),
                Argument::with_binding("_", "count", "Int"),
            ],
        );
        assert_eq!(render_call(&call), ".init(session: urlSession, count)");
        assert_eq!(render_call(&Call::function("build", vec![])), "build()");
    }

    #[test]
    fn renders_a_resolver() {
        let resolve = signature("resolveA", vec![Argument::new("id", "UserID")], "A");
        let intercept = signature(
            "interceptA",
            vec![Argument::with_binding("_", "build", "() -> A")],
            "A",
        );
        let output = ResolverOutput {
            name: "AppResolver".to_string(),
            provider_name: "AppProvider".to_string(),
            inherited_resolver_names: vec!["BaseResolver".to_string()],
            resolve_signatures: vec![resolve.clone()],
            intercept_signatures: vec![intercept.clone()],
            resolve_implementations: vec![FunctionImplementation {
                signature: resolve,
                body: vec![Statement::ReturnIntercepted {
                    interceptor: "interceptA".to_string(),
                    body: vec![
                        Statement::Bind {
                            name: "b".to_string(),
                            call: Call::function("resolveB", vec![]),
                        },
                        Statement::Return(Call::member(
                            "init",
                            vec![Argument::new("b", "B"), Argument::new("id", "UserID")],
                        )),
                    ],
                }],
            }],
            intercept_implementations: vec![FunctionImplementation {
                signature: intercept,
                body: vec![Statement::Return(Call::function("build", vec![]))],
            }],
        };

        let text = emitter().emit(&["Foundation".to_string()], &[output]);

        assert_eq!(
            text,
            "\
import Foundation

protocol AppResolver: AppProvider, BaseResolver {
    func resolveA(id: UserID) -> A

    func interceptA(_ build: () -> A) -> A
}

extension AppResolver {

    func resolveA(id: UserID) -> A {
        return interceptA {
            let b = resolveB()
            return .init(b: b, id: id)
        }
    }
}

extension AppResolver {

    func interceptA(_ build: () -> A) -> A {
        return build()
    }
}
"
        );
    }

    #[test]
    fn empty_resolver_has_an_empty_body() {
        let output = ResolverOutput {
            name: "EmptyResolver".to_string(),
            provider_name: "EmptyProvider".to_string(),
            inherited_resolver_names: vec![],
            resolve_signatures: vec![],
            intercept_signatures: vec![],
            resolve_implementations: vec![],
            intercept_implementations: vec![],
        };

        assert_eq!(
            emitter().emit(&[], &[output]),
            "protocol EmptyResolver: EmptyProvider {\n}\n"
        );
    }

    #[test]
    fn preamble_declares_the_markers() {
        let emitter = ProtocolEmitter::new(EmitOptions::default(), Markers::default());

        assert_eq!(
            emitter.emit(&[], &[]),
            "public protocol Injectable {}\n\npublic protocol Provider {}\n"
        );
    }
}
