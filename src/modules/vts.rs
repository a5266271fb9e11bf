//! Virtual table module, installed under `/vts`.
//!
//! ```text
//! /vts/table/<name>?cmd=get|pop|push&row=&col=&delimiter=&deleterow=
//! /vts/manager?cmd=create|delete|reload&table=&filename=&delimiter=
//! ```

use std::sync::Arc;

use crate::config::TableConfig;
use crate::http::{Request, Response};
use crate::modules::params::{self, ManagerCommand, TableCommand, CMD, DELIMITER, FILENAME, TABLE};
use crate::modules::usage;
use crate::observability::metrics;
use crate::routing::{HandlerError, Module};
use crate::table::{TableError, TableRegistry};

/// Top-level path segment of the module.
pub const PREFIX: &str = "vts";

/// Acknowledgement body of every successful write.
const ACK: &str = "OK";

/// Row/cell access and table management over the shared registry.
pub struct VtsModule {
    tables: Arc<TableRegistry>,
}

impl VtsModule {
    pub fn new(tables: Arc<TableRegistry>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Arc<TableRegistry> {
        &self.tables
    }

    fn invoke_table(&self, request: &Request, response: &mut Response, segments: &[String]) -> Result<(), HandlerError> {
        let Some(name) = segments.first() else {
            response.set_ok(format!(
                "No table selected<br/><br/>{}",
                usage::table_usage(&self.tables.summaries())
            ));
            return Ok(());
        };

        let Some(table) = self.tables.get(name) else {
            return Err(HandlerError::validation(format!(
                "Table {} not found!<br/><br/>{}",
                name,
                usage::table_usage(&self.tables.summaries())
            )));
        };

        let command = TableCommand::from_request(request).map_err(|cmd| {
            HandlerError::validation(format!(
                "Unknown command {}<br/><br/>{}",
                cmd,
                usage::table_usage(&self.tables.summaries())
            ))
        })?;

        if !command.allows(request.method) {
            return Err(HandlerError::validation(command.wrong_method()));
        }

        let selector = params::selector(request)?;
        let result = match command {
            TableCommand::Get => table.get(&selector),
            TableCommand::Pop => table.pop(&selector, params::delete_row(request)),
            TableCommand::Push => request
                .body
                .as_deref()
                .ok_or(TableError::MissingData)
                .and_then(|data| table.push(&selector, data))
                .map(|()| ACK.to_string()),
        };
        metrics::record_table_operation(&command.to_string(), result.is_ok());

        response.set_ok(result?);
        Ok(())
    }

    fn invoke_manager(&self, request: &Request, response: &mut Response, segments: &[String]) -> Result<(), HandlerError> {
        if !request.has_params() || !segments.is_empty() {
            response.set_ok(usage::manager_usage(&self.tables.summaries()));
            return Ok(());
        }

        let command: ManagerCommand = match request.param(CMD) {
            Some(cmd) => cmd.parse().map_err(|cmd| {
                HandlerError::validation(format!(
                    "Unknown command {}<br/><br/>{}",
                    cmd,
                    usage::manager_usage(&self.tables.summaries())
                ))
            })?,
            None => {
                return Err(HandlerError::validation(format!(
                    "No command given<br/><br/>{}",
                    usage::manager_usage(&self.tables.summaries())
                )))
            }
        };

        let name = request.param(TABLE).unwrap_or_default();
        let filename = request.param(FILENAME);
        let delimiter = request.param(DELIMITER);

        let result = match command {
            ManagerCommand::Create => self
                .tables
                .create(&TableConfig {
                    name: name.to_string(),
                    filename: filename.map(str::to_string),
                    delimiter: delimiter.map(str::to_string),
                })
                .map(|_| ())
                .map_err(with_context("unable to create table")),
            ManagerCommand::Delete => self
                .tables
                .delete(name)
                .map(|_| ())
                .map_err(with_context("unable to delete table")),
            ManagerCommand::Reload => self
                .tables
                .reload(name, filename, delimiter)
                .map(|_| ())
                .map_err(with_context("unable to reload table")),
        };
        metrics::record_table_operation(&command.to_string(), result.is_ok());

        result?;
        response.set_ok(ACK);
        Ok(())
    }
}

/// Map a table error, naming the failed command when it is not the caller's fault.
fn with_context(context: &'static str) -> impl Fn(TableError) -> HandlerError {
    move |err| {
        if err.is_validation() {
            HandlerError::Validation(err.to_string())
        } else {
            HandlerError::internal(context, err)
        }
    }
}

impl Module for VtsModule {
    fn prefix(&self) -> &'static str {
        PREFIX
    }

    fn description(&self) -> String {
        format!("/{} - VtsModule - virtual table server.", PREFIX)
    }

    fn handle(&self, request: &Request, response: &mut Response, segments: &[String]) -> Result<(), HandlerError> {
        match segments.first().map(String::as_str) {
            Some("table") => self.invoke_table(request, response, &segments[1..]),
            Some("manager") => self.invoke_manager(request, response, &segments[1..]),
            _ => {
                response.set_ok(usage::module_usage());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, StatusCode};
    use crate::routing::Router;
    use crate::table::Selector;

    fn setup() -> (Arc<TableRegistry>, Router) {
        let tables = Arc::new(TableRegistry::new());
        let router = Router::new().install(Arc::new(VtsModule::new(Arc::clone(&tables))));
        (tables, router)
    }

    fn send(router: &Router, method: Method, target: &str, body: Option<&str>) -> Response {
        let mut request = Request::new(method, target);
        request.body = body.map(str::to_string);
        router.dispatch(&request)
    }

    fn body(response: &Response) -> &str {
        response.body().unwrap_or_default()
    }

    #[test]
    fn scenario_create_push_get() {
        let (tables, router) = setup();
        let created = send(&router, Method::Get, "/vts/manager?cmd=create&table=T", None);
        assert_eq!(created, Response::ok("OK"));

        let pushed = send(&router, Method::Post, "/vts/table/t?cmd=push", Some("a;b;c"));
        assert_eq!(pushed, Response::ok("OK"));
        assert_eq!(tables.lookup("t").unwrap().len(), 1);

        assert_eq!(body(&send(&router, Method::Get, "/vts/table/t?row=0", None)), "a;b;c");
        assert_eq!(body(&send(&router, Method::Get, "/vts/table/T?row=0&col=1", None)), "b");
    }

    #[test]
    fn module_usage_without_known_second_segment() {
        let (_, router) = setup();
        for target in ["/vts", "/vts/other"] {
            let response = send(&router, Method::Get, target, None);
            assert_eq!(response.status(), StatusCode::Ok);
            assert!(body(&response).starts_with("The module has two modes"));
        }
    }

    #[test]
    fn table_without_name_is_usage() {
        let (_, router) = setup();
        let response = send(&router, Method::Get, "/vts/table", None);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(body(&response).starts_with("No table selected"));
    }

    #[test]
    fn unknown_table_and_command_are_rejected() {
        let (tables, router) = setup();
        let response = send(&router, Method::Get, "/vts/table/ghost", None);
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(body(&response).starts_with("Table ghost not found!"));

        tables.create(&TableConfig::named("t")).unwrap();
        let response = send(&router, Method::Get, "/vts/table/t?cmd=shuffle", None);
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(body(&response).starts_with("Unknown command shuffle"));
    }

    #[test]
    fn wrong_method_leaves_table_untouched() {
        let (tables, router) = setup();
        let table = tables.create(&TableConfig::named("t")).unwrap();
        table.push(&Selector::new(), "row").unwrap();

        let response = send(&router, Method::Post, "/vts/table/t?cmd=pop", None);
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cursor(), 0);

        let response = send(&router, Method::Get, "/vts/table/t?cmd=push", Some("x"));
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(body(&response), "Wrong request method. Use a POST or PUT request.");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn engine_failures_are_validation_errors() {
        let (tables, router) = setup();
        tables.create(&TableConfig::named("t")).unwrap();

        let empty = send(&router, Method::Get, "/vts/table/t", None);
        assert_eq!(empty, Response::with_body(StatusCode::BadRequest, "table is empty"));

        let no_body = send(&router, Method::Put, "/vts/table/t?cmd=push", None);
        assert_eq!(no_body.status(), StatusCode::BadRequest);

        send(&router, Method::Put, "/vts/table/t?cmd=push", Some("a"));
        let bad_row = send(&router, Method::Get, "/vts/table/t?row=7", None);
        assert_eq!(bad_row.status(), StatusCode::BadRequest);
        let bad_col = send(&router, Method::Get, "/vts/table/t?col=x", None);
        assert_eq!(bad_col.status(), StatusCode::BadRequest);
    }

    #[test]
    fn pop_through_module() {
        let (tables, router) = setup();
        let table = tables.create(&TableConfig::named("t")).unwrap();
        table.push(&Selector::new(), "only").unwrap();
        table.push(&Selector::new().row(1), "a;b").unwrap();

        let cell = send(&router, Method::Get, "/vts/table/t?cmd=pop&row=1&col=0&deleterow=false", None);
        assert_eq!(body(&cell), "a");
        let single = send(&router, Method::Get, "/vts/table/t?cmd=pop&row=0&col=0&deleterow=false", None);
        assert_eq!(body(&single), "only");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn manager_usage_and_errors() {
        let (tables, router) = setup();
        let usage = send(&router, Method::Get, "/vts/manager", None);
        assert_eq!(usage.status(), StatusCode::Ok);
        assert!(body(&usage).starts_with("Table manager:"));

        let extra = send(&router, Method::Get, "/vts/manager/more?cmd=create&table=x", None);
        assert!(body(&extra).starts_with("Table manager:"));
        assert!(!tables.contains("x"));

        let unknown = send(&router, Method::Get, "/vts/manager?cmd=truncate&table=x", None);
        assert_eq!(unknown.status(), StatusCode::BadRequest);

        let no_cmd = send(&router, Method::Get, "/vts/manager?table=x", None);
        assert_eq!(no_cmd.status(), StatusCode::BadRequest);

        let nameless = send(&router, Method::Get, "/vts/manager?cmd=create", None);
        assert_eq!(nameless.status(), StatusCode::BadRequest);

        let missing = send(&router, Method::Get, "/vts/manager?cmd=delete&table=x", None);
        assert_eq!(missing, Response::with_body(StatusCode::BadRequest, "table x not found"));
    }

    #[test]
    fn manager_delete_and_reload() {
        let (tables, router) = setup();
        tables.create(&TableConfig::named("t")).unwrap();

        let no_source = send(&router, Method::Get, "/vts/manager?cmd=reload&table=t", None);
        assert_eq!(no_source.status(), StatusCode::BadRequest);

        let bad_file = send(
            &router,
            Method::Get,
            "/vts/manager?cmd=reload&table=t&filename=/definitely/not/here.txt",
            None,
        );
        assert_eq!(bad_file.status(), StatusCode::InternalServerError);
        assert!(body(&bad_file).starts_with("unable to reload table<br/><br/>"));

        let deleted = send(&router, Method::Get, "/vts/manager?cmd=delete&table=t", None);
        assert_eq!(deleted, Response::ok("OK"));
        assert!(tables.is_empty());
    }

    #[test]
    fn create_from_missing_file_is_internal_error() {
        let (tables, router) = setup();
        let response = send(
            &router,
            Method::Get,
            "/vts/manager?cmd=create&table=t&filename=/definitely/not/here.txt",
            None,
        );
        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert!(!tables.contains("t"));
    }
}
