use anyhow::Result;
use log::debug;
use std::io::{BufRead, Write};

use crate::account_store::AccountStore;
use crate::atm::Atm;
use crate::types::{Amount, Credentials, Outcome, Request};

const ACTION_PROMPT: &str = "What would you like to do? [see balance, deposit, or withdraw]: ";
const CONTINUE_PROMPT: &str = "Would you like to continue using the ATM? [y or n]: ";

/// The actions a user can pick at the machine
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    SeeBalance,
    Deposit,
    Withdraw,
}

impl Action {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "see balance" => Some(Action::SeeBalance),
            "deposit" => Some(Action::Deposit),
            "withdraw" => Some(Action::Withdraw),
            _ => None,
        }
    }
}

/// Line based dialogue with the user, end of input is reported as `None`
struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Repeat `question` until `parse` accepts the answer
    fn ask_until<T>(
        &mut self,
        question: &str,
        complaint: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        while let Some(answer) = self.ask(question)? {
            if let Some(value) = parse(&answer) {
                return Ok(Some(value));
            }
            self.say(complaint)?;
        }
        Ok(None)
    }

    fn read_request(&mut self) -> Result<Option<Request>> {
        let action = match self.ask_until(
            ACTION_PROMPT,
            "Please provide your option as see balance, deposit, or withdraw.",
            Action::parse,
        )? {
            Some(action) => action,
            None => return Ok(None),
        };

        let card = match self.ask("Please provide your card name: ")? {
            Some(card) => card,
            None => return Ok(None),
        };
        let pin = match self.ask("Please provide your pin number: ")? {
            Some(pin) => pin,
            None => return Ok(None),
        };
        let account_type = match self.ask("Please provide the type of the account you are using: ")? {
            Some(account_type) => account_type,
            None => return Ok(None),
        };
        let credentials = Credentials {
            card,
            pin,
            account_type,
        };

        if action == Action::SeeBalance {
            return Ok(Some(Request::SeeBalance(credentials)));
        }

        let amount = match self.ask_until(
            "Please provide the amount: ",
            "Please provide the amount as a whole, non-negative number.",
            |answer| answer.trim().parse::<Amount>().ok(),
        )? {
            Some(amount) => amount,
            None => return Ok(None),
        };

        Ok(Some(match action {
            Action::Deposit => Request::Deposit(credentials, amount),
            _ => Request::Withdraw(credentials, amount),
        }))
    }

    fn report(&mut self, request: &Request, outcome: Outcome) -> Result<()> {
        let account_type = match request {
            Request::SeeBalance(c) | Request::Deposit(c, _) | Request::Withdraw(c, _) => {
                &c.account_type
            }
        };

        let message = match outcome {
            Outcome::Balance(balance) => format!(
                "Your {} account has the balance of {}.",
                account_type,
                dollars(balance)
            ),
            Outcome::Deposited(amount) => format!(
                "Successfully deposited {} into the {} account.",
                dollars(amount),
                account_type
            ),
            Outcome::Withdrew(amount) => format!(
                "Successfully withdrew {} from the {} account.",
                dollars(amount),
                account_type
            ),
            Outcome::Failed => "The operation could not be completed.".to_string(),
        };
        self.say(&message)
    }
}

fn dollars(amount: Amount) -> String {
    format!("${}.00", amount)
}

/// Run the interactive ATM dialogue until the user opts out or the input ends
pub fn run<S: AccountStore>(
    atm: &mut Atm<S>,
    input: impl BufRead,
    output: impl Write,
) -> Result<()> {
    let mut session = Session { input, output };

    loop {
        let request = match session.read_request()? {
            Some(request) => request,
            None => break,
        };

        let outcome = atm.handle(&request);
        debug!("Handled request with outcome {:?}", outcome);
        session.report(&request, outcome)?;

        let carry_on = session.ask_until(
            CONTINUE_PROMPT,
            "Please provide your option as y or n",
            |answer| match answer {
                "y" => Some(true),
                "n" => Some(false),
                _ => None,
            },
        )?;
        if carry_on != Some(true) {
            break;
        }
    }

    Ok(())
}
