// ABOUTME: Interactive recipe composition as an explicit state machine over any reader and writer
// ABOUTME: Looks foods up in NDB, upserts the chosen ones, and commits the finished recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::{AppResult, Food, Ingredient, Recipe};
use foodlab_ndb::{food_from_report, search_stream, FoodSource, SearchConfig, SearchHit};
use futures_util::TryStreamExt;
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument};

use super::prompt::{parse_choice, parse_quantity, parse_yes_no, Prompter};
use crate::graph::CallContext;
use crate::recipes::{RecipePersister, UpsertCoordinator};

/// Invalid answers tolerated per question
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Search hits offered per ingredient search
pub const DEFAULT_SEARCH_RESULTS: usize = 10;

/// Composer behavior
#[derive(Debug, Clone, Copy)]
pub struct ComposerConfig {
    /// Invalid answers tolerated per question
    pub max_attempts: u32,
    /// Paging and hit limit for ingredient searches
    pub search: SearchConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            search: SearchConfig::default().with_max_results(DEFAULT_SEARCH_RESULTS),
        }
    }
}

/// How a composition ended
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeOutcome {
    /// Recipe committed with assigned ids
    Saved(Recipe),
    /// Input ended before the recipe was complete; nothing was written
    Aborted,
}

#[derive(Debug)]
enum Step {
    Name,
    IngredientSearch,
    FoodChoice(Vec<SearchHit>),
    Quantity(Food),
    MoreIngredients,
    Instruction,
    MoreInstructions,
    Done,
}

/// One interactive composition
pub struct ComposerSession<'a> {
    source: &'a dyn FoodSource,
    upserts: &'a UpsertCoordinator,
    persister: &'a RecipePersister,
    config: ComposerConfig,
}

impl<'a> ComposerSession<'a> {
    /// Session wired to its collaborators
    #[must_use]
    pub fn new(
        source: &'a dyn FoodSource,
        upserts: &'a UpsertCoordinator,
        persister: &'a RecipePersister,
        config: ComposerConfig,
    ) -> Self {
        Self {
            source,
            upserts,
            persister,
            config,
        }
    }

    /// Walk the user through naming the recipe, choosing ingredients, and
    /// writing instructions, then commit it
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a question exhausts its attempt budget; NDB,
    /// store, and I/O errors otherwise. Nothing is committed on error.
    #[instrument(skip_all)]
    pub async fn run<R: BufRead, W: Write>(
        &self,
        ctx: &CallContext,
        input: R,
        output: W,
    ) -> AppResult<ComposeOutcome> {
        let mut prompter = Prompter::new(input, output, self.config.max_attempts);
        let mut recipe = Recipe::new("");
        let mut step = Step::Name;

        loop {
            debug!(?step, "composer step");
            step = match step {
                Step::Name => {
                    let Some(answer) = prompter.ask("Recipe name: ")? else {
                        return abort(&mut prompter);
                    };
                    if answer.is_empty() {
                        prompter.reject("The recipe needs a name")?;
                        Step::Name
                    } else {
                        prompter.accept();
                        recipe.name = answer;
                        Step::IngredientSearch
                    }
                }
                Step::IngredientSearch => {
                    let Some(answer) = prompter.ask("Search for an ingredient: ")? else {
                        return abort(&mut prompter);
                    };
                    if answer.is_empty() {
                        prompter.reject("Please enter a search term")?;
                        Step::IngredientSearch
                    } else {
                        let hits: Vec<SearchHit> =
                            search_stream(self.source, &answer, self.config.search)
                                .try_collect()
                                .await?;
                        if hits.is_empty() {
                            prompter.reject(&format!("No foods match '{answer}'"))?;
                            Step::IngredientSearch
                        } else {
                            prompter.accept();
                            Step::FoodChoice(hits)
                        }
                    }
                }
                Step::FoodChoice(hits) => {
                    for (index, hit) in hits.iter().enumerate() {
                        prompter.say(&format!("{:>3}. {} ({})", index + 1, hit.name, hit.ndbno))?;
                    }
                    let Some(answer) = prompter.ask("Choose a food: ")? else {
                        return abort(&mut prompter);
                    };
                    match parse_choice(&answer, hits.len()) {
                        Err(reason) => {
                            prompter.reject(&reason)?;
                            Step::FoodChoice(hits)
                        }
                        Ok(index) => {
                            prompter.accept();
                            let food = self.store_food(ctx, &hits[index]).await?;
                            if food.measurements.is_empty() {
                                prompter.say(&format!(
                                    "'{}' has no measurements; choose another food",
                                    food.name
                                ))?;
                                Step::IngredientSearch
                            } else {
                                Step::Quantity(food)
                            }
                        }
                    }
                }
                Step::Quantity(food) => {
                    let units: Vec<&str> =
                        food.measurements.iter().map(|m| m.unit.as_str()).collect();
                    let question = format!("Quantity ({}): ", units.join(", "));
                    let Some(answer) = prompter.ask(&question)? else {
                        return abort(&mut prompter);
                    };
                    match parse_quantity(&answer, &food) {
                        Err(reason) => {
                            prompter.reject(&reason)?;
                            Step::Quantity(food)
                        }
                        Ok((value, unit)) => {
                            prompter.accept();
                            recipe.ingredients.push(Ingredient::new(food, unit, value));
                            Step::MoreIngredients
                        }
                    }
                }
                Step::MoreIngredients => {
                    let Some(answer) = prompter.ask("Add another ingredient? [y/n]: ")? else {
                        return abort(&mut prompter);
                    };
                    match parse_yes_no(&answer) {
                        Err(reason) => {
                            prompter.reject(&reason)?;
                            Step::MoreIngredients
                        }
                        Ok(more) => {
                            prompter.accept();
                            if more {
                                Step::IngredientSearch
                            } else {
                                Step::Instruction
                            }
                        }
                    }
                }
                Step::Instruction => {
                    let question = format!("Step {}: ", recipe.instructions.len() + 1);
                    let Some(answer) = prompter.ask(&question)? else {
                        return abort(&mut prompter);
                    };
                    if answer.is_empty() {
                        prompter.reject("Please describe the step")?;
                        Step::Instruction
                    } else {
                        prompter.accept();
                        recipe.push_instruction(answer);
                        Step::MoreInstructions
                    }
                }
                Step::MoreInstructions => {
                    let Some(answer) = prompter.ask("Add another step? [y/n]: ")? else {
                        return abort(&mut prompter);
                    };
                    match parse_yes_no(&answer) {
                        Err(reason) => {
                            prompter.reject(&reason)?;
                            Step::MoreInstructions
                        }
                        Ok(more) => {
                            prompter.accept();
                            if more {
                                Step::Instruction
                            } else {
                                Step::Done
                            }
                        }
                    }
                }
                Step::Done => {
                    let saved = self.persister.add_recipe(ctx, &recipe).await?;
                    info!(recipe = %saved.name, id = ?saved.id, "recipe composed");
                    prompter.say(&format!("Saved '{}'", saved.name))?;
                    return Ok(ComposeOutcome::Saved(saved));
                }
            };
        }
    }

    /// Fetch the report for a hit and get-or-create its food
    async fn store_food(&self, ctx: &CallContext, hit: &SearchHit) -> AppResult<Food> {
        let report = self.source.food_report(&hit.ndbno).await?;
        let food = food_from_report(&report);
        self.upserts.get_or_create_food(ctx, &food).await
    }
}

fn abort<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> AppResult<ComposeOutcome> {
    prompter.say("")?;
    prompter.say("Aborted; nothing was saved")?;
    info!("composition aborted at end of input");
    Ok(ComposeOutcome::Aborted)
}
