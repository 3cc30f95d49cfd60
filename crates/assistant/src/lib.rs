//! Free text to posted transactions.
//!
//! The assistant sends the user's text plus the current category lists to an
//! external classifier and posts each extracted line item through the engine,
//! in the order the classifier returned them. Items post independently; a
//! failure stops further posting but never rolls back what already settled.

use std::sync::Arc;

use chrono::Utc;
use engine::{
    Category, CategoryKind, Currency, Engine, EngineError, PostingCmd, Transaction,
    TransactionKind,
};
use uuid::Uuid;

pub use classifier::{
    Classifier, ClassifierConfig, ClassifierReply, LineItem, LineKind, OpenAiClassifier, Prompt,
};
pub use error::ClassifierError;

mod classifier;
mod error;

/// Terminal outcome of a parse call.
///
/// "Needs clarification" is not a failure: it asks the user for a follow-up
/// input. `Failed` carries a user-readable message, never a raw error.
#[derive(Debug)]
pub enum ParseOutcome {
    Created {
        transactions: Vec<Transaction>,
        message: String,
    },
    NeedsClarification {
        question: String,
    },
    Failed {
        error: String,
    },
}

pub struct Assistant {
    engine: Arc<Engine>,
    classifier: Box<dyn Classifier>,
}

impl Assistant {
    pub fn new(engine: Arc<Engine>, classifier: Box<dyn Classifier>) -> Self {
        Self { engine, classifier }
    }

    /// Parse free text into posted transactions.
    ///
    /// Storage errors while gathering context propagate as [`EngineError`];
    /// everything after the classifier call is folded into the outcome.
    pub async fn parse(
        &self,
        text: &str,
        account_id: Option<Uuid>,
    ) -> Result<ParseOutcome, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ParseOutcome::Failed {
                error: "There is nothing to parse. Describe a purchase or an income.".to_string(),
            });
        }

        let categories = self.engine.list_categories().await?;
        let account_id = match account_id {
            Some(id) => id,
            None => match self.engine.list_regular_accounts().await?.first() {
                Some(account) => account.id,
                None => {
                    return Ok(ParseOutcome::Failed {
                        error: "No account to attach transactions to. Create an account first."
                            .to_string(),
                    });
                }
            },
        };

        let prompt = build_prompt(text, &categories);
        let reply = match self.classifier.classify(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "classifier call failed");
                return Ok(ParseOutcome::Failed {
                    error: err.user_message().to_string(),
                });
            }
        };

        if reply.needs_clarification {
            let question = reply
                .clarification_question
                .filter(|question| !question.trim().is_empty())
                .unwrap_or_else(|| {
                    "Could you describe the transaction in more detail?".to_string()
                });
            return Ok(ParseOutcome::NeedsClarification { question });
        }

        if reply.transactions.is_empty() {
            return Ok(ParseOutcome::Failed {
                error: "No transactions were recognized. Try rephrasing.".to_string(),
            });
        }

        let total = reply.transactions.len();
        let mut created = Vec::new();
        let mut failure = None;
        for item in reply.transactions {
            let label = item
                .description
                .clone()
                .unwrap_or_else(|| format!("item {}", created.len() + 1));
            match self.intent_for(&item, account_id, &categories) {
                Ok(cmd) => match self.engine.post(cmd).await {
                    Ok(tx) => created.push(tx),
                    Err(err) => {
                        tracing::warn!(error = %err, item = %label, "posting line item failed");
                        failure = Some(format!("'{label}' could not be posted"));
                        break;
                    }
                },
                Err(reason) => {
                    failure = Some(format!("'{label}' {reason}"));
                    break;
                }
            }
        }

        match failure {
            None => {
                let message = format!("Created {} transaction(s).", created.len());
                Ok(ParseOutcome::Created {
                    transactions: created,
                    message,
                })
            }
            Some(reason) if created.is_empty() => Ok(ParseOutcome::Failed { error: reason }),
            Some(reason) => {
                let message = format!(
                    "Created {} of {} transaction(s); {}.",
                    created.len(),
                    total,
                    reason
                );
                Ok(ParseOutcome::Created {
                    transactions: created,
                    message,
                })
            }
        }
    }

    /// Turn a line item into a posting intent, applying the defaulting rules:
    /// unknown currency codes fall back to TJS, and a missing or unknown
    /// category id falls back to the first category of the item's type.
    fn intent_for(
        &self,
        item: &LineItem,
        account_id: Uuid,
        categories: &[Category],
    ) -> Result<PostingCmd, String> {
        let amount_minor = amount_to_minor(item.amount).ok_or("has an invalid amount")?;

        let (kind, category_kind) = match item.kind {
            LineKind::Income => (TransactionKind::Income, CategoryKind::Income),
            LineKind::Expense => (TransactionKind::Expense, CategoryKind::Expense),
        };

        let category_id = item
            .category_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .filter(|id| categories.iter().any(|category| category.id == *id))
            .or_else(|| {
                categories
                    .iter()
                    .find(|category| category.kind == category_kind)
                    .map(|category| category.id)
            })
            .ok_or("has no usable category and none exists to fall back to")?;

        let currency = item
            .currency
            .as_deref()
            .and_then(|code| Currency::try_from(code).ok())
            .unwrap_or_default();

        let mut cmd = PostingCmd::new(kind, account_id, amount_minor, Utc::now())
            .currency(currency)
            .category_id(category_id);
        if let Some(description) = item.description.as_deref() {
            cmd = cmd.description(description);
        }
        Ok(cmd)
    }
}

/// Convert a major-unit amount (`22.5`) into minor units (`2250`).
///
/// Rejects non-finite, non-positive and absurdly large values so a confused
/// classifier reply cannot overflow the ledger or post a zero amount.
fn amount_to_minor(amount: f64) -> Option<i64> {
    if !amount.is_finite() || amount <= 0.0 || amount >= 1_000_000_000.0 {
        return None;
    }
    let minor = (amount * 100.0).round() as i64;
    (minor > 0).then_some(minor)
}

fn build_prompt(text: &str, categories: &[Category]) -> Prompt {
    let expense_list = category_lines(categories, CategoryKind::Expense);
    let income_list = category_lines(categories, CategoryKind::Income);

    let system = format!(
        "You are a personal finance assistant. Extract transactions from the user's text.\n\
         \n\
         AVAILABLE EXPENSE CATEGORIES:\n{expense_list}\n\
         \n\
         AVAILABLE INCOME CATEGORIES:\n{income_list}\n\
         \n\
         RULES:\n\
         1. Extract EVERY purchase/income mentioned\n\
         2. Determine the amount and currency (somoni/smn = TJS, ruble = RUB, $ = USD, tenge = KZT)\n\
         3. Pick the category that fits the meaning best\n\
         4. If nothing fits, use the first available category\n\
         \n\
         RESPONSE FORMAT (strict JSON):\n\
         {{\n\
           \"transactions\": [\n\
             {{\n\
               \"description\": \"short description\",\n\
               \"amount\": number,\n\
               \"currency\": \"TJS\",\n\
               \"categoryId\": \"id from the lists above\",\n\
               \"type\": \"expense\"\n\
             }}\n\
           ],\n\
           \"needsClarification\": false,\n\
           \"clarificationQuestion\": null\n\
         }}\n\
         \n\
         IMPORTANT: always return valid JSON with no extra text."
    );

    Prompt {
        system,
        user: text.to_string(),
    }
}

fn category_lines(categories: &[Category], kind: CategoryKind) -> String {
    let lines: Vec<String> = categories
        .iter()
        .filter(|category| category.kind == kind)
        .map(|category| format!("- {} (id: \"{}\")", category.name, category.id))
        .collect();
    if lines.is_empty() {
        "- (none)".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_convert_to_minor_units() {
        assert_eq!(amount_to_minor(22.0), Some(2_200));
        assert_eq!(amount_to_minor(22.5), Some(2_250));
    }

    #[test]
    fn degenerate_amounts_are_rejected() {
        assert_eq!(amount_to_minor(0.0), None);
        assert_eq!(amount_to_minor(-5.0), None);
        assert_eq!(amount_to_minor(f64::NAN), None);
        assert_eq!(amount_to_minor(f64::INFINITY), None);
        assert_eq!(amount_to_minor(1e12), None);
    }

    #[test]
    fn prompt_partitions_categories_by_kind() {
        let mut food = Category::new("Food".to_string(), CategoryKind::Expense);
        food.is_default = true;
        let salary = Category::new("Salary".to_string(), CategoryKind::Income);

        let prompt = build_prompt("coffee 22", &[food.clone(), salary.clone()]);
        let expense_section = prompt
            .system
            .split("AVAILABLE INCOME CATEGORIES:")
            .next()
            .unwrap();
        assert!(expense_section.contains(&food.id.to_string()));
        assert!(!expense_section.contains(&salary.id.to_string()));
        assert!(prompt.system.contains(&salary.id.to_string()));
        assert_eq!(prompt.user, "coffee 22");
    }
}
