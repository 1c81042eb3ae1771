pub mod openai_completion;
