//! SQL scripts for statements that must be run by hand in the SQL editor.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A script file and its fixed contents.
#[derive(Debug, Clone, Copy)]
pub struct SqlScript {
    pub file_name: &'static str,
    pub contents: &'static str,
}

pub const SQL_SCRIPTS: &[SqlScript] = &[
    SqlScript {
        file_name: "create_workouts.sql",
        contents: r#"
-- Create workouts table
CREATE TABLE IF NOT EXISTS workouts (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    class_id UUID REFERENCES classes(id) ON DELETE CASCADE,
    user_id UUID,  -- References auth.users or profiles
    duration INTEGER, -- duration in minutes
    calories_burned INTEGER,
    notes TEXT,
    completed_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);

-- Enable RLS
ALTER TABLE workouts ENABLE ROW LEVEL SECURITY;
"#,
    },
    SqlScript {
        file_name: "create_plans.sql",
        contents: r#"
-- Create subscription plans table
CREATE TABLE IF NOT EXISTS plans (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    price INTEGER NOT NULL, -- price in cents
    duration_days INTEGER NOT NULL,
    description TEXT,
    features JSONB,
    is_active BOOLEAN DEFAULT true,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);

-- Enable RLS
ALTER TABLE plans ENABLE ROW LEVEL SECURITY;

-- Sample data
INSERT INTO plans (name, price, duration_days, description, features) VALUES
('Day Pass', 2000, 1, 'Single day access to all gyms', '["All gym access", "Group classes", "Basic facilities"]'),
('Weekly Pass', 10000, 7, 'One week unlimited access', '["All gym access", "Group classes", "Personal training session", "Towel service"]'),
('Monthly Pass', 35000, 30, 'Full month membership', '["All gym access", "Unlimited classes", "3 personal training sessions", "Nutrition consultation"]');
"#,
    },
    SqlScript {
        file_name: "create_subscriptions.sql",
        contents: r#"
-- Create subscriptions table
CREATE TABLE IF NOT EXISTS subscriptions (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    user_id UUID, -- References auth.users or profiles
    plan_id UUID REFERENCES plans(id) ON DELETE CASCADE,
    status VARCHAR(20) DEFAULT 'pending', -- pending, active, cancelled, expired
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    stripe_subscription_id VARCHAR(255),
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
    updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);

-- Enable RLS
ALTER TABLE subscriptions ENABLE ROW LEVEL SECURITY;
"#,
    },
    SqlScript {
        file_name: "create_payments.sql",
        contents: r#"
-- Create payments table
CREATE TABLE IF NOT EXISTS payments (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    user_id UUID, -- References auth.users or profiles
    subscription_id UUID REFERENCES subscriptions(id) ON DELETE SET NULL,
    booking_id UUID REFERENCES bookings(id) ON DELETE SET NULL,
    amount INTEGER NOT NULL, -- amount in cents
    currency VARCHAR(3) DEFAULT 'USD',
    status VARCHAR(20) DEFAULT 'pending', -- pending, completed, failed, refunded
    stripe_payment_intent_id VARCHAR(255),
    payment_method VARCHAR(50),
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);

-- Enable RLS
ALTER TABLE payments ENABLE ROW LEVEL SECURITY;
"#,
    },
];

/// Write one script into `dir`, returning the path written.
pub fn write_sql_script(dir: &Path, script: &SqlScript) -> Result<PathBuf> {
    let path = dir.join(script.file_name);
    fs::write(&path, script.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write every script into `dir`, creating it if needed.
///
/// Each file is written independently; one failure doesn't stop the rest.
pub fn write_sql_scripts(dir: &Path) -> Vec<(&'static str, Result<PathBuf>)> {
    if let Err(e) = fs::create_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "Could not create output directory");
    }
    SQL_SCRIPTS
        .iter()
        .map(|script| (script.file_name, write_sql_script(dir, script)))
        .collect()
}

/// A file the setup work is expected to leave in the output directory.
#[derive(Debug, Clone, Copy)]
pub struct Artifact {
    pub name: &'static str,
    pub purpose: &'static str,
    pub action: &'static str,
}

pub const ARTIFACTS: &[Artifact] = &[
    Artifact {
        name: "create_workouts.sql",
        purpose: "Creates workouts table for tracking completed exercises",
        action: "Run in Supabase SQL Editor",
    },
    Artifact {
        name: "create_plans.sql",
        purpose: "Creates subscription plans table with pricing",
        action: "Run in Supabase SQL Editor",
    },
    Artifact {
        name: "create_subscriptions.sql",
        purpose: "Creates user subscriptions table",
        action: "Run in Supabase SQL Editor",
    },
    Artifact {
        name: "create_payments.sql",
        purpose: "Creates payments table for transaction tracking",
        action: "Run in Supabase SQL Editor",
    },
    Artifact {
        name: "lovable_config.js",
        purpose: "Supabase client configuration for Lovable.io",
        action: "Copy to Lovable.io project",
    },
    Artifact {
        name: "CaboFitPassApp.jsx",
        purpose: "Complete React app with booking and subscription features",
        action: "Use as main component in Lovable.io",
    },
    Artifact {
        name: "LOVABLE_INTEGRATION.md",
        purpose: "Complete integration guide and deployment instructions",
        action: "Follow step-by-step guide",
    },
];

/// Size in bytes of an artifact in `dir`, or `None` if it isn't there.
pub fn artifact_size(dir: &Path, artifact: &Artifact) -> Option<u64> {
    fs::metadata(dir.join(artifact.name))
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_every_script() {
        let dir = tempfile::tempdir().unwrap();

        let results = write_sql_scripts(dir.path());

        assert_eq!(results.len(), SQL_SCRIPTS.len());
        for (name, result) in results {
            let path = result.unwrap();
            assert_eq!(path.file_name().unwrap(), name);
            let written = fs::read_to_string(path).unwrap();
            assert!(written.contains("CREATE TABLE IF NOT EXISTS"));
            assert!(written.contains("ENABLE ROW LEVEL SECURITY"));
        }
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sql").join("out");

        let results = write_sql_scripts(&nested);

        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert!(nested.join("create_plans.sql").exists());
    }

    #[test]
    fn test_unwritable_directory_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let results = write_sql_scripts(&blocker);

        assert_eq!(results.len(), SQL_SCRIPTS.len());
        assert!(results.iter().all(|(_, r)| r.is_err()));
    }

    #[test]
    fn test_every_script_is_a_known_artifact() {
        for script in SQL_SCRIPTS {
            assert!(ARTIFACTS.iter().any(|a| a.name == script.file_name));
        }
    }

    #[test]
    fn test_artifact_size() {
        let dir = tempfile::tempdir().unwrap();
        let script = &SQL_SCRIPTS[0];
        write_sql_script(dir.path(), script).unwrap();

        assert_eq!(
            artifact_size(dir.path(), &ARTIFACTS[0]),
            Some(script.contents.len() as u64)
        );
        assert_eq!(artifact_size(dir.path(), &ARTIFACTS[6]), None);
    }
}
