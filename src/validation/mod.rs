// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * RaySentry - Validation Module
 * Input validation for targets and job commands
 *
 * Copyright 2025 Bountyy Oy
 */

pub mod input_validator;

pub use input_validator::{
    InputValidator,
    ValidationResult,
    DEFAULT_DESTRUCTIVE_PATTERNS,
    SHELL_METACHARACTERS,
};
