use crate::core::{CommandResult, SqlcmdError};
use crate::data_set::DataSet;
use crate::manager::DatabaseManager;
use crate::results_grid::ResultsGrid;
use std::io::{self, BufRead, Write};

/// Separates a command from its arguments
const SEPARATOR: char = '|';

/// Represents a parsed console command.
#[derive(Debug, PartialEq)]
pub enum Command {
    Connect {
        database: String,
        user: String,
        password: String,
    },
    Tables,
    Find(String),
    Insert { table: String, values: Vec<String> },
    Delete { table: String, id: i64 },
    Close,
    Help,
    Exit,
    Unknown(String),
}

/// Parses a line of the form `command|arg1|arg2...` into a `Command`.
///
/// Malformed input (wrong number of arguments, a non-numeric id) yields
/// `Command::Unknown` carrying the original line.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let parts: Vec<&str> = input.split(SEPARATOR).map(str::trim).collect();
    let unknown = || Command::Unknown(input.to_string());

    match parts.as_slice() {
        ["connect", database, user, password] => Command::Connect {
            database: database.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        },
        ["tables"] => Command::Tables,
        ["find", table] => Command::Find(table.to_string()),
        ["insert", table, values @ ..] if !values.is_empty() => Command::Insert {
            table: table.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        },
        ["delete", table, id] => match id.parse() {
            Ok(id) => Command::Delete {
                table: table.to_string(),
                id,
            },
            Err(_) => unknown(),
        },
        ["close"] => Command::Close,
        ["help"] => Command::Help,
        ["exit"] => Command::Exit,
        _ => unknown(),
    }
}

/// Help text listing every console command
pub fn help_text() -> String {
    [
        "Available commands:",
        "  connect|database|user|password - Connect to a database",
        "  tables - List the tables of the connected database",
        "  find|table - Show every row of a table",
        "  insert|table|value1|value2|... - Insert a row",
        "  delete|table|id - Delete the row with the given id",
        "  close - Close the connection",
        "  help - List all available commands",
        "  exit - Close the connection and quit",
    ]
    .join("\n")
}

/// A command console over a `DatabaseManager`
pub struct Console {
    manager: DatabaseManager,
}

impl Console {
    pub fn new(manager: DatabaseManager) -> Self {
        Console { manager }
    }

    pub fn manager(&self) -> &DatabaseManager {
        &self.manager
    }

    /// Executes a command and returns the text to print.
    ///
    /// # Errors
    ///
    /// Returns `SqlcmdError::Command` when the command failed or was not
    /// understood; the message is meant for the user.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        match command {
            Command::Connect {
                database,
                user,
                password,
            } => {
                if self.manager.connect(&database, &user, &password) {
                    Ok(Some(format!("Connected to {}", database)))
                } else {
                    Err(SqlcmdError::Command(format!("Could not connect to {}", database)))
                }
            }
            Command::Tables => {
                self.require_connection()?;
                let names = self.manager.table_names();
                if names.is_empty() {
                    Ok(Some("(no tables)".to_string()))
                } else {
                    Ok(Some(format!("[{}]", names.join(", "))))
                }
            }
            Command::Find(table) => {
                self.require_connection()?;
                let mut grid = ResultsGrid::new();
                grid.set_headers(self.manager.column_names(&table));
                if grid.headers.is_empty() {
                    return Err(SqlcmdError::Command(format!("Table {} not found", table)));
                }
                let rows = self.manager.table_data(&table);
                let count = rows.len();
                for row in &rows {
                    grid.add_row(row);
                }
                Ok(Some(format!("{}\n({} rows)", grid.render(), count)))
            }
            Command::Insert { table, values } => {
                self.require_connection()?;
                let data_set = DataSet::from(values);
                if self.manager.insert(&table, &data_set) {
                    Ok(Some(format!("Inserted ({}) into {}", data_set.row(), table)))
                } else {
                    Err(SqlcmdError::Command(format!("Could not insert into {}", table)))
                }
            }
            Command::Delete { table, id } => {
                self.require_connection()?;
                if self.manager.delete(&table, id) {
                    Ok(Some(format!("Deleted id {} from {}", id, table)))
                } else {
                    Err(SqlcmdError::Command(format!("Nothing deleted from {} for id {}", table, id)))
                }
            }
            Command::Close => {
                self.manager.close();
                Ok(Some("Connection closed".to_string()))
            }
            Command::Help => Ok(Some(help_text())),
            Command::Exit => {
                self.manager.close();
                Ok(None)
            }
            Command::Unknown(input) => Err(SqlcmdError::Command(format!(
                "Unknown command: {:?}. Type help for a list of commands",
                input
            ))),
        }
    }

    fn require_connection(&self) -> Result<(), SqlcmdError> {
        if self.manager.is_connected() {
            Ok(())
        } else {
            Err(SqlcmdError::Command(
                "Not connected. Use connect|database|user|password first".to_string(),
            ))
        }
    }

    /// Reads commands line by line until `exit` or end of input.
    ///
    /// Results go to `output`, errors to `errors`.
    pub fn run<R: BufRead, W: Write, E: Write>(&mut self, input: R, mut output: W, mut errors: E) -> io::Result<()> {
        writeln!(output, "Welcome to sqlcmd! Type help for a list of commands.")?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                let command = parse_command(&line);
                let exit = command == Command::Exit;
                match self.execute(command) {
                    Ok(Some(text)) => writeln!(output, "{}", text)?,
                    Ok(None) => {}
                    Err(e) => writeln!(errors, "{}", e)?,
                }
                if exit {
                    writeln!(output, "Bye")?;
                    return Ok(());
                }
            }
            write!(output, "> ")?;
            output.flush()?;
        }

        self.manager.close();
        writeln!(output)?;
        Ok(())
    }
}

/// Runs a console on standard input and output
pub fn run_repl(manager: DatabaseManager) -> io::Result<()> {
    let stdin = io::stdin();
    Console::new(manager).run(stdin.lock(), io::stdout(), io::stderr())
}
